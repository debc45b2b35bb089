//! Version-currency result of a single check

use crate::version::is_newer;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the locally known version was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalSource {
    /// Given explicitly (`--current` or `current = ...`)
    Override,
    /// `node_modules/<app>/package.json`
    Installed,
    /// `package-lock.json`
    Lockfile,
    /// Declared in `package.json`
    Declared,
}

impl LocalSource {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            LocalSource::Override => "override",
            LocalSource::Installed => "node_modules",
            LocalSource::Lockfile => "package-lock.json",
            LocalSource::Declared => "package.json",
        }
    }
}

/// Outcome of comparing the local version against the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionStatus {
    /// Locally known/tested version
    pub local: String,
    /// Where the local version came from
    pub source: LocalSource,
    /// Latest version published under the dist-tag
    pub latest: String,
    /// Dist-tag that was consulted
    pub tag: String,
    /// Publish time of the latest version
    pub released_at: Option<DateTime<Utc>>,
    /// True when no newer version exists
    pub is_current: bool,
}

impl VersionStatus {
    /// Build a status for the `latest` dist-tag
    pub fn new(local: impl Into<String>, source: LocalSource, latest: impl Into<String>) -> Self {
        let local = local.into();
        let latest = latest.into();
        let is_current = !is_newer(&latest, &local);
        Self {
            local,
            source,
            latest,
            tag: "latest".to_string(),
            released_at: None,
            is_current,
        }
    }

    /// Set the dist-tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the publish time of the latest version
    pub fn with_released_at(mut self, released_at: Option<DateTime<Utc>>) -> Self {
        self.released_at = released_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_versions_are_current() {
        let status = VersionStatus::new("1.4.0", LocalSource::Installed, "1.4.0");
        assert!(status.is_current);
        assert_eq!(status.tag, "latest");
    }

    #[test]
    fn test_newer_latest_is_not_current() {
        let status = VersionStatus::new("1.4.0", LocalSource::Lockfile, "1.5.0");
        assert!(!status.is_current);
    }

    #[test]
    fn test_local_ahead_of_tag_is_current() {
        let status = VersionStatus::new("2.0.0-beta.1", LocalSource::Override, "1.9.0");
        assert!(status.is_current);
    }

    #[test]
    fn test_v_prefix_does_not_matter() {
        let status = VersionStatus::new("v1.4.0", LocalSource::Declared, "1.4.0");
        assert!(status.is_current);
    }

    #[test]
    fn test_builders() {
        let status = VersionStatus::new("1.0.0", LocalSource::Installed, "1.0.0").with_tag("next");
        assert_eq!(status.tag, "next");
        assert!(status.released_at.is_none());
    }

    #[test]
    fn test_local_source_labels() {
        assert_eq!(LocalSource::Installed.label(), "node_modules");
        assert_eq!(LocalSource::Lockfile.label(), "package-lock.json");
        assert_eq!(LocalSource::Declared.label(), "package.json");
        assert_eq!(LocalSource::Override.label(), "override");
    }
}
