//! Reader for `package-lock.json`
//!
//! Handles:
//! - lockfile v2/v3: `packages["node_modules/<app>"].version`
//! - lockfile v1: `dependencies[<app>].version`
//!
//! A locked "version" that is a git or tarball URL is not a version and is
//! ignored, so the lookup falls through to `package.json`.

use crate::domain::{AppId, LocalSource};
use crate::error::ManifestError;
use crate::manifest::LocalVersionReader;
use crate::version::base_version;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Reads the locked version from `package-lock.json`
pub struct LockfileReader;

impl LocalVersionReader for LockfileReader {
    fn source(&self) -> LocalSource {
        LocalSource::Lockfile
    }

    fn manifest_path(&self, project: &Path, _app: &AppId) -> PathBuf {
        project.join("package-lock.json")
    }

    fn read_version(
        &self,
        json: &Value,
        app: &AppId,
        _path: &Path,
    ) -> Result<Option<String>, ManifestError> {
        let key = format!("node_modules/{}", app);
        let from_packages = json
            .get("packages")
            .and_then(|p| p.get(&key))
            .and_then(|entry| entry.get("version"))
            .and_then(|v| v.as_str());

        let from_dependencies = || {
            json.get("dependencies")
                .and_then(|d| d.get(app.as_str()))
                .and_then(|entry| entry.get("version"))
                .and_then(|v| v.as_str())
        };

        let locked = from_packages.or_else(from_dependencies);
        if let Some(resolved) = locked.filter(|v| base_version(v).is_none()) {
            tracing::debug!(app = %app, resolved, "locked entry is not a registry version");
            return Ok(None);
        }

        Ok(locked.map(|v| v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app() -> AppId {
        AppId::new("@bdelab/roar-letter").unwrap()
    }

    fn read(json: Value) -> Option<String> {
        LockfileReader
            .read_version(&json, &app(), Path::new("package-lock.json"))
            .unwrap()
    }

    #[test]
    fn test_lockfile_v3() {
        let json = json!({
            "lockfileVersion": 3,
            "packages": {
                "": {"name": "dashboard"},
                "node_modules/@bdelab/roar-letter": {"version": "1.6.2"}
            }
        });
        assert_eq!(read(json).as_deref(), Some("1.6.2"));
    }

    #[test]
    fn test_lockfile_v1() {
        let json = json!({
            "lockfileVersion": 1,
            "dependencies": {
                "@bdelab/roar-letter": {"version": "1.0.9"}
            }
        });
        assert_eq!(read(json).as_deref(), Some("1.0.9"));
    }

    #[test]
    fn test_nested_install_is_not_top_level() {
        let json = json!({
            "packages": {
                "node_modules/other/node_modules/@bdelab/roar-letter": {"version": "0.1.0"}
            }
        });
        assert_eq!(read(json), None);
    }

    #[test]
    fn test_lockfile_v1_git_dependency_is_ignored() {
        let json = json!({
            "lockfileVersion": 1,
            "dependencies": {
                "@bdelab/roar-letter": {
                    "version": "git+https://github.com/bdelab/roar-letter.git#4f2c1e9"
                }
            }
        });
        assert_eq!(read(json), None);
    }

    #[test]
    fn test_tarball_version_is_ignored() {
        let json = json!({
            "packages": {
                "node_modules/@bdelab/roar-letter": {
                    "version": "file:vendor/roar-letter-1.0.0.tgz"
                }
            }
        });
        assert_eq!(read(json), None);
    }

    #[test]
    fn test_missing_package() {
        assert_eq!(read(json!({"packages": {}})), None);
    }
}
