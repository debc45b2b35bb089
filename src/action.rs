//! Delegated action run when a newer version is detected
//!
//! This module provides:
//! - The DelegatedAction trait the gate invokes
//! - CommandAction, which executes an external command line

use crate::error::ActionError;
use serde::Serialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of a delegated action that completed successfully
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult {
    /// The command that was executed
    pub command: String,
    /// Exit code reported by the command
    pub exit_code: Option<i32>,
    /// Wall-clock time the action took
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(value.as_millis() as u64)
}

impl ActionResult {
    /// Create a result for a finished action
    pub fn new(command: impl Into<String>, exit_code: Option<i32>, elapsed: Duration) -> Self {
        Self {
            command: command.into(),
            exit_code,
            elapsed,
        }
    }

    /// Result for an in-process action with no command line
    pub fn completed(label: impl Into<String>) -> Self {
        Self::new(label, Some(0), Duration::ZERO)
    }
}

/// Zero-argument action invoked by the gate
pub trait DelegatedAction {
    /// Run the action once
    fn run(&mut self) -> Result<ActionResult, ActionError>;
}

impl<F> DelegatedAction for F
where
    F: FnMut() -> Result<ActionResult, ActionError>,
{
    fn run(&mut self) -> Result<ActionResult, ActionError> {
        self()
    }
}

/// Runs an external command with inherited stdio
#[derive(Debug, Clone)]
pub struct CommandAction {
    /// Program followed by its arguments
    command: Vec<String>,
    /// Directory the command runs in
    working_dir: PathBuf,
    /// Write the command's stdout to our stderr
    stdout_to_stderr: bool,
}

impl CommandAction {
    /// Create a command action. Returns `None` for an empty command line.
    pub fn new(command: Vec<String>, working_dir: impl Into<PathBuf>) -> Option<Self> {
        if command.is_empty() || command[0].trim().is_empty() {
            return None;
        }
        Some(Self {
            command,
            working_dir: working_dir.into(),
            stdout_to_stderr: false,
        })
    }

    /// Send the command's stdout to stderr, keeping our stdout for the report
    pub fn with_stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }

    /// The command line as a single display string
    pub fn display(&self) -> String {
        self.command.join(" ")
    }
}

impl DelegatedAction for CommandAction {
    fn run(&mut self) -> Result<ActionResult, ActionError> {
        let command_str = self.display();
        tracing::debug!(command = %command_str, dir = %self.working_dir.display(), "running delegated action");

        let started = Instant::now();
        let mut command = Command::new(&self.command[0]);
        command.args(&self.command[1..]).current_dir(&self.working_dir);
        if self.stdout_to_stderr {
            command.stdout(Stdio::from(std::io::stderr()));
        }

        let status = command
            .status()
            .map_err(|source| ActionError::Spawn {
                command: command_str.clone(),
                source,
            })?;
        let elapsed = started.elapsed();

        if status.success() {
            Ok(ActionResult::new(command_str, status.code(), elapsed))
        } else {
            Err(ActionError::Failed {
                command: command_str,
                code: status.code(),
            })
        }
    }
}
