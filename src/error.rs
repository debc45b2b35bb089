//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: Issues reading local package metadata
//! - RegistryError: Issues with package registry communication
//! - ConfigError: Issues with CLI options or the gate file
//! - ActionError: The delegated action could not run or failed

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Local manifest related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package registry related errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Delegated action errors
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Errors related to local manifest files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error (package.json, package-lock.json)
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },

    /// The package is neither installed, locked nor declared in the project
    #[error("package '{package}' is not installed or declared in {project}")]
    PackageNotDeclared { package: String, project: PathBuf },

    /// Invalid version specification
    #[error("invalid version specification '{spec}' in {path}: {message}")]
    InvalidVersionSpec {
        path: PathBuf,
        spec: String,
        message: String,
    },
}

/// Errors related to package registry communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Application identifier is not a valid package name
    #[error("invalid application identifier '{value}': {message}")]
    InvalidAppId { value: String, message: String },

    /// Registry URL could not be used
    #[error("invalid registry URL '{value}': expected an http(s) URL")]
    InvalidRegistry { value: String },

    /// No command given for a gate that may need to run one
    #[error("no command given for '{app}'")]
    MissingCommand { app: String },

    /// Failed to read the gate file
    #[error("failed to read gate file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Gate file is not valid TOML or has the wrong shape
    #[error("failed to parse gate file {path}: {message}")]
    TomlParseError { path: PathBuf, message: String },

    /// Conflicting options
    #[error("conflicting options: {message}")]
    ConflictingOptions { message: String },
}

/// Errors raised by the delegated action
#[derive(Error, Debug)]
pub enum ActionError {
    /// The command could not be started
    #[error("failed to start '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran and reported failure
    #[error("'{command}' failed with {}", exit_label(.code))]
    Failed { command: String, code: Option<i32> },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl ManifestError {
    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new PackageNotDeclared error
    pub fn package_not_declared(package: impl Into<String>, project: impl Into<PathBuf>) -> Self {
        ManifestError::PackageNotDeclared {
            package: package.into(),
            project: project.into(),
        }
    }

    /// Creates a new InvalidVersionSpec error
    pub fn invalid_version_spec(
        path: impl Into<PathBuf>,
        spec: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::InvalidVersionSpec {
            path: path.into(),
            spec: spec.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidAppId error
    pub fn invalid_app_id(value: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidAppId {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a new TomlParseError
    pub fn toml_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::TomlParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_error_json_parse() {
        let err = ManifestError::json_parse_error("/path/to/package.json", "unexpected token");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_manifest_error_package_not_declared() {
        let err = ManifestError::package_not_declared("@bdelab/roar-letter", "/app");
        let msg = format!("{}", err);
        assert!(msg.contains("'@bdelab/roar-letter' is not installed or declared"));
        assert!(msg.contains("/app"));
    }

    #[test]
    fn test_manifest_error_invalid_version_spec() {
        let err =
            ManifestError::invalid_version_spec("/path/to/package.json", "workspace:*", "no version");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid version specification"));
        assert!(msg.contains("workspace:*"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "npm");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("npm"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("lodash", "npm", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_invalid_response() {
        let err = RegistryError::invalid_response("lodash", "npm", "missing dist-tag 'next'");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid response from npm"));
        assert!(msg.contains("missing dist-tag 'next'"));
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("npm");
        let msg = format!("{}", err);
        assert!(msg.contains("rate limit exceeded"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("@bdelab/roar-letter", "npm");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("@bdelab/roar-letter"));
    }

    #[test]
    fn test_config_error_invalid_app_id() {
        let err = ConfigError::invalid_app_id("", "must not be empty");
        let msg = format!("{}", err);
        assert!(msg.contains("invalid application identifier"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn test_config_error_missing_command() {
        let err = ConfigError::MissingCommand {
            app: "@bdelab/roar-letter".to_string(),
        };
        assert_eq!(err.to_string(), "no command given for '@bdelab/roar-letter'");
    }

    #[test]
    fn test_action_error_failed_with_code() {
        let err = ActionError::Failed {
            command: "npx cypress run".to_string(),
            code: Some(3),
        };
        assert_eq!(err.to_string(), "'npx cypress run' failed with exit code 3");
    }

    #[test]
    fn test_action_error_failed_by_signal() {
        let err = ActionError::Failed {
            command: "sleep 10".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("terminated by signal"));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let registry_err = RegistryError::package_not_found("pkg", "npm");
        let app_err: AppError = registry_err.into();
        let msg = format!("{}", app_err);
        assert!(msg.contains("package 'pkg' not found"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::ConflictingOptions {
            message: "--app and --config cannot be used together".to_string(),
        };
        let app_err: AppError = config_err.into();
        assert!(app_err.to_string().contains("conflicting options"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::package_not_declared("x", "/p");
        let debug = format!("{:?}", err);
        assert!(debug.contains("PackageNotDeclared"));
    }
}
