//! Reader for the installed copy under `node_modules`

use crate::domain::{AppId, LocalSource};
use crate::error::ManifestError;
use crate::manifest::LocalVersionReader;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads `node_modules/<app>/package.json`
pub struct InstalledPackageReader;

impl LocalVersionReader for InstalledPackageReader {
    fn source(&self) -> LocalSource {
        LocalSource::Installed
    }

    fn manifest_path(&self, project: &Path, app: &AppId) -> PathBuf {
        project
            .join("node_modules")
            .join(app.as_str())
            .join("package.json")
    }

    fn read_version(
        &self,
        json: &Value,
        app: &AppId,
        _path: &Path,
    ) -> Result<Option<String>, ManifestError> {
        // A stale directory left by another package is not a match
        if let Some(name) = json.get("name").and_then(|v| v.as_str()) {
            if name != app.as_str() {
                return Ok(None);
            }
        }

        Ok(json
            .get("version")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string()))
    }
}
