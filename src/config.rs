//! Gate file parsing
//!
//! A gate file lists several gates evaluated by one invocation:
//!
//! ```toml
//! project = "."
//! registry = "https://registry.npmjs.org"
//! tag = "latest"
//!
//! [[gate]]
//! app = "@bdelab/roar-letter"
//! command = ["npx", "cypress", "run", "--spec", "cypress/e2e/playLetter.cy.js"]
//! ```

use crate::domain::AppId;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Parsed gate file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateFile {
    /// Node project root, relative to the gate file
    pub project: Option<PathBuf>,
    /// Registry base URL
    pub registry: Option<String>,
    /// Default dist-tag
    pub tag: Option<String>,
    /// Gates in evaluation order
    #[serde(rename = "gate", default)]
    pub gates: Vec<GateSpec>,
}

/// One gate entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateSpec {
    /// Package whose version is checked
    pub app: AppId,
    /// Command to run when a newer version exists
    #[serde(default)]
    pub command: Vec<String>,
    /// Known version, instead of looking it up in the project
    pub current: Option<String>,
    /// Dist-tag for this gate
    pub tag: Option<String>,
    /// Working directory of the command, relative to the project
    pub workdir: Option<PathBuf>,
}

impl GateFile {
    /// Parse gate file content
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let file: GateFile = toml::from_str(content)
            .map_err(|e| ConfigError::toml_parse_error(path, e.to_string()))?;

        if file.gates.is_empty() {
            return Err(ConfigError::toml_parse_error(path, "no [[gate]] entries"));
        }

        Ok(file)
    }

    /// Read and parse a gate file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let mut file = Self::parse(&content, path)?;

        // Relative project paths are resolved against the gate file's directory
        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        file.project = Some(match file.project.take() {
            Some(project) if project.is_relative() => base.join(project),
            Some(project) => project,
            None => base.to_path_buf(),
        });

        Ok(file)
    }
}
