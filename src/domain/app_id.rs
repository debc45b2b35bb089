//! Application identifier type
//!
//! An application identifier names the npm package whose version currency
//! is checked (e.g. `@bdelab/roar-letter`).

use crate::error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Maximum length of an npm package name
const MAX_NAME_LENGTH: usize = 214;

/// npm package name: optional `@scope/` prefix followed by a URL-safe name
static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9\-*~][a-z0-9\-*._~]*/)?[a-z0-9\-~][a-z0-9\-._~]*$")
        .expect("package name pattern is valid")
});

/// Validated, immutable application identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AppId(String);

impl AppId {
    /// Create an identifier, validating it against npm naming rules
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(ConfigError::invalid_app_id(value, "must not be empty"));
        }
        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(ConfigError::invalid_app_id(
                value,
                format!("longer than {} characters", MAX_NAME_LENGTH),
            ));
        }
        if !PACKAGE_NAME.is_match(trimmed) {
            return Err(ConfigError::invalid_app_id(
                value,
                "not a valid npm package name",
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The identifier as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segment used to address the package on a registry.
    ///
    /// The scope separator is percent-encoded the same way the npm client does.
    pub fn registry_path(&self) -> String {
        self.0.replacen('/', "%2f", 1)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AppId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AppId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AppId> for String {
    fn from(value: AppId) -> Self {
        value.0
    }
}

impl AsRef<str> for AppId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
