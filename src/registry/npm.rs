//! npm Registry adapter
//!
//! Fetches package metadata from an npm-compatible registry.
//! API endpoint: {registry}/{package}, scoped names as `@scope%2fname`

use crate::domain::AppId;
use crate::error::{ConfigError, RegistryError};
use crate::registry::{HttpClient, RegistryAdapter};
use crate::version::VersionInfo;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Public npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response (fields this adapter reads)
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Tag name to version
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    /// Version (and `created`/`modified`) to timestamp
    #[serde(default)]
    time: HashMap<String, String>,
}

impl NpmAdapter {
    /// Create an adapter for a custom registry (mirror, Verdaccio, ...)
    pub fn with_registry(client: HttpClient, base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://"))
            || trimmed.len() <= "https://".len()
        {
            return Err(ConfigError::InvalidRegistry {
                value: base_url.to_string(),
            });
        }

        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    /// Build the URL for a package
    fn build_url(&self, app: &AppId) -> String {
        format!("{}/{}", self.base_url, app.registry_path())
    }
}

/// Pick the tagged version and its publish time out of a registry document
fn tagged_version(
    response: &NpmPackageResponse,
    app: &AppId,
    tag: &str,
    registry: &str,
) -> Result<VersionInfo, RegistryError> {
    let version = response.dist_tags.get(tag).ok_or_else(|| {
        RegistryError::invalid_response(
            app.as_str(),
            registry,
            format!("missing dist-tag '{}'", tag),
        )
    })?;

    let released_at = response
        .time
        .get(version)
        .and_then(|t| t.parse::<DateTime<Utc>>().ok());

    Ok(VersionInfo::new(version.clone(), released_at))
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn registry_name(&self) -> &'static str {
        "npm"
    }

    async fn fetch_tagged(&self, app: &AppId, tag: &str) -> Result<VersionInfo, RegistryError> {
        let url = self.build_url(app);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, app.as_str(), self.registry_name())
            .await?;

        let info = tagged_version(&response, app, tag, self.registry_name())?;
        tracing::debug!(app = %app, tag, version = %info.version, "registry dist-tag");
        Ok(info)
    }
}
