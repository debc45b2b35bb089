//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One line per gate with the versions compared and the branch taken
//! - Failure lines with the underlying error
//! - Summary line

use crate::domain::{GateDecision, GateOutcome, VersionStatus};
use crate::orchestrator::{FailureKind, GateReport, OrchestratorResult};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// `1.4.0 → 1.5.0 (latest)` style comparison
    fn versions(&self, status: &VersionStatus) -> String {
        let mut line = if status.is_current {
            format!("{} (current on {})", status.local, status.tag)
        } else if self.color {
            format!(
                "{} {} {} ({})",
                status.local.dimmed(),
                "→".dimmed(),
                status.latest.bright_white().bold(),
                status.tag
            )
        } else {
            format!("{} -> {} ({})", status.local, status.latest, status.tag)
        };

        if self.verbosity == Verbosity::Verbose {
            line.push_str(&format!(" [local: {}]", status.source.label()));
            if let Some(released_at) = status.released_at {
                line.push_str(&format!(
                    " [published {}]",
                    released_at.format("%Y/%m/%d %H:%M")
                ));
            }
        }
        line
    }

    fn marker(&self, symbol: &'static str, paint: fn(&str) -> String) -> String {
        if self.color {
            paint(symbol)
        } else {
            symbol.to_string()
        }
    }

    fn format_outcome(&self, outcome: &GateOutcome, writer: &mut dyn Write) -> std::io::Result<()> {
        let versions = self.versions(&outcome.status);
        match (&outcome.decision, &outcome.action) {
            (GateDecision::Skip, _) => writeln!(
                writer,
                "{} {} {} — skipped",
                self.marker("✓", |s| s.green().to_string()),
                outcome.app,
                versions
            ),
            (GateDecision::Delegate, Some(action)) => writeln!(
                writer,
                "{} {} {} — ran `{}` in {:.1}s",
                self.marker("↑", |s| s.yellow().to_string()),
                outcome.app,
                versions,
                action.command,
                action.elapsed.as_secs_f64()
            ),
            (GateDecision::Delegate, None) => writeln!(
                writer,
                "{} {} {} — newer version",
                self.marker("↑", |s| s.yellow().to_string()),
                outcome.app,
                versions
            ),
        }
    }

    fn format_report(&self, report: &GateReport, writer: &mut dyn Write) -> std::io::Result<()> {
        match report {
            GateReport::Completed(outcome) => self.format_outcome(outcome, writer),
            GateReport::Decided {
                app,
                decision,
                status,
            } => {
                let verdict = match decision {
                    GateDecision::Skip => "would skip",
                    GateDecision::Delegate => "would run",
                };
                writeln!(
                    writer,
                    "{} {} {} — {}",
                    self.marker("•", |s| s.cyan().to_string()),
                    app,
                    self.versions(status),
                    verdict
                )
            }
            GateReport::Failed {
                app,
                kind,
                message,
                ..
            } => {
                let label = match kind {
                    FailureKind::Check => "check failed",
                    FailureKind::Action => "command failed",
                };
                writeln!(
                    writer,
                    "{} {} — {}: {}",
                    self.marker("✗", |s| s.red().bold().to_string()),
                    app,
                    label,
                    message
                )
            }
        }
    }

    fn format_summary(
        &self,
        result: &OrchestratorResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let ran_label = if result.check_only { "to run" } else { "ran" };
        let failed = result.failed();
        let failed_str = if self.color && failed > 0 {
            failed.to_string().red().bold().to_string()
        } else {
            failed.to_string()
        };

        writeln!(
            writer,
            "Summary: {} skipped, {} {}, {} failed",
            result.skipped(),
            result.delegated(),
            ran_label,
            failed_str
        )
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for report in &result.reports {
                self.format_report(report, writer)?;
            }
        }

        // A single gate already says everything on its own line
        if result.reports.len() > 1 || self.verbosity == Verbosity::Quiet {
            self.format_summary(result, writer)?;
        }
        Ok(())
    }
}
