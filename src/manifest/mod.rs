//! Local version discovery for Node projects
//!
//! The locally known version of a package is looked up, in order, in:
//! - `node_modules/<app>/package.json` (what is installed)
//! - `package-lock.json` (what is locked)
//! - `package.json` (what is declared, range operators stripped)

mod installed;
mod lockfile;
mod package_json;

pub use installed::InstalledPackageReader;
pub use lockfile::LockfileReader;
pub use package_json::PackageJsonReader;

use crate::domain::{AppId, LocalSource};
use crate::error::ManifestError;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A locally known version and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersion {
    /// The version string
    pub version: String,
    /// Which kind of file provided it
    pub source: LocalSource,
    /// The file it was read from
    pub path: PathBuf,
}

/// Trait for reading a package version out of one kind of project file
pub trait LocalVersionReader {
    /// The kind of file this reader handles
    fn source(&self) -> LocalSource;

    /// Location of the file for the given package
    fn manifest_path(&self, project: &Path, app: &AppId) -> PathBuf;

    /// Extract the package version from the parsed file
    fn read_version(
        &self,
        json: &Value,
        app: &AppId,
        path: &Path,
    ) -> Result<Option<String>, ManifestError>;
}

/// Readers in lookup order
pub fn readers() -> Vec<Box<dyn LocalVersionReader + Send + Sync>> {
    vec![
        Box::new(InstalledPackageReader),
        Box::new(LockfileReader),
        Box::new(PackageJsonReader),
    ]
}

/// Find the locally known version of `app` under `project`
pub fn locate_local_version(project: &Path, app: &AppId) -> Result<LocalVersion, ManifestError> {
    for reader in readers() {
        let path = reader.manifest_path(project, app);
        let Some(json) = read_json(&path)? else {
            tracing::trace!(path = %path.display(), "not present");
            continue;
        };

        if let Some(version) = reader.read_version(&json, app, &path)? {
            tracing::debug!(
                app = %app,
                version = %version,
                source = reader.source().label(),
                "found local version"
            );
            return Ok(LocalVersion {
                version,
                source: reader.source(),
                path,
            });
        }
    }

    Err(ManifestError::package_not_declared(app.as_str(), project))
}

/// Read and parse a JSON file. A missing file yields `None`.
fn read_json(path: &Path) -> Result<Option<Value>, ManifestError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ManifestError::read_error(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))
}
