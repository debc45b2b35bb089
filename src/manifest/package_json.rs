//! Reader for the declared version in `package.json`
//!
//! Handles:
//! - dependencies
//! - devDependencies
//! - peerDependencies
//! - optionalDependencies

use crate::domain::{AppId, LocalSource};
use crate::error::ManifestError;
use crate::manifest::LocalVersionReader;
use crate::version::base_version;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Dependency tables consulted, in order
const DEPENDENCY_TABLES: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Reads the declared version from `package.json`
pub struct PackageJsonReader;

impl LocalVersionReader for PackageJsonReader {
    fn source(&self) -> LocalSource {
        LocalSource::Declared
    }

    fn manifest_path(&self, project: &Path, _app: &AppId) -> PathBuf {
        project.join("package.json")
    }

    fn read_version(
        &self,
        json: &Value,
        app: &AppId,
        path: &Path,
    ) -> Result<Option<String>, ManifestError> {
        let spec = DEPENDENCY_TABLES.iter().find_map(|table| {
            json.get(*table)
                .and_then(|deps| deps.get(app.as_str()))
                .and_then(|v| v.as_str())
        });

        let Some(spec) = spec else {
            return Ok(None);
        };

        base_version(spec).map(Some).ok_or_else(|| {
            ManifestError::invalid_version_spec(
                path,
                spec,
                "cannot derive a single version from this specification",
            )
        })
    }
}
