//! Registry adapters for fetching package version information
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter

mod client;
mod npm;

pub use client::HttpClient;
pub use npm::{NpmAdapter, NPM_REGISTRY_URL};

use crate::domain::AppId;
use crate::error::RegistryError;
use crate::version::VersionInfo;
use async_trait::async_trait;

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the version a dist-tag currently points at
    async fn fetch_tagged(&self, app: &AppId, tag: &str) -> Result<VersionInfo, RegistryError>;
}
