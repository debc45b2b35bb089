//! Output formatting for gate results
//!
//! This module provides:
//! - Text output for human-readable display
//! - JSON output for machine processing
//! - The console sink for gate diagnostics

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::gate::GateLog;
use crate::orchestrator::OrchestratorResult;
use colored::Colorize;
use std::io::{self, Write};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Whether to use colors (when supported)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create configuration from CLI arguments
    pub fn from_cli(json: bool, verbose: bool, quiet: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: true,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the orchestrator result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Text => Box::new(TextFormatter::with_color(config.verbosity, config.color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
    }
}

/// Gate diagnostics written to stderr and mirrored as tracing events
///
/// Quiet mode shortens the stdout report only; diagnostics are always shown.
pub struct ConsoleLog<W: Write = io::Stderr> {
    writer: W,
}

impl ConsoleLog {
    /// Create a sink writing to stderr
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleLog<W> {
    /// Create a sink writing to `writer`
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink, returning its writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> GateLog for ConsoleLog<W> {
    fn log(&mut self, message: &str) {
        tracing::info!("{}", message);
        // A closed stderr must not abort the gate
        let _ = writeln!(self.writer, "{}", message.cyan());
    }
}
