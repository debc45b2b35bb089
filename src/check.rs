//! Registry-backed version-currency check
//!
//! Compares the locally known version of a package (override, installed
//! copy, lockfile, or declaration) with the version the registry's dist-tag
//! points at.

use crate::domain::{AppId, LocalSource, VersionStatus};
use crate::error::AppError;
use crate::gate::VersionCheck;
use crate::manifest::locate_local_version;
use crate::registry::RegistryAdapter;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

/// Default dist-tag consulted on the registry
pub const DEFAULT_TAG: &str = "latest";

/// Version check against a package registry
pub struct RegistryVersionCheck {
    /// Registry adapter used for the latest version
    registry: Box<dyn RegistryAdapter>,
    /// Node project root used for local lookups
    project: PathBuf,
    /// Dist-tag to compare against
    tag: String,
    /// Explicit local versions, keyed by application
    overrides: HashMap<AppId, String>,
}

impl RegistryVersionCheck {
    /// Create a check for packages of the project at `project`
    pub fn new(registry: Box<dyn RegistryAdapter>, project: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            project: project.into(),
            tag: DEFAULT_TAG.to_string(),
            overrides: HashMap::new(),
        }
    }

    /// Compare against another dist-tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Use `version` as the known version of `app` instead of looking it up
    pub fn with_override(mut self, app: AppId, version: impl Into<String>) -> Self {
        self.overrides.insert(app, version.into());
        self
    }

    fn local_version(&self, app: &AppId) -> Result<(String, LocalSource), AppError> {
        if let Some(version) = self.overrides.get(app) {
            return Ok((version.clone(), LocalSource::Override));
        }
        let local = locate_local_version(&self.project, app)?;
        Ok((local.version, local.source))
    }
}

#[async_trait]
impl VersionCheck for RegistryVersionCheck {
    async fn check(&self, app: &AppId) -> Result<VersionStatus, AppError> {
        let (local, source) = self.local_version(app)?;
        let latest = self.registry.fetch_tagged(app, &self.tag).await?;

        Ok(VersionStatus::new(local, source, latest.version)
            .with_tag(self.tag.clone())
            .with_released_at(latest.released_at))
    }
}
