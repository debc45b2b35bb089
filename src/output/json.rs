//! JSON output formatter for machine processing

use crate::action::ActionResult;
use crate::domain::{GateDecision, VersionStatus};
use crate::orchestrator::{FailureKind, GateReport, OrchestratorResult};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Whether commands were suppressed
    check_only: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-gate results
    gates: Vec<JsonGate<'a>>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    skipped: usize,
    delegated: usize,
    failed: usize,
    exit_code: u8,
}

/// JSON representation of one gate
#[derive(Serialize)]
struct JsonGate<'a> {
    app: &'a str,
    /// `skip`, `delegate`, or `failed`
    result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    versions: Option<&'a VersionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<&'a ActionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

fn decision_label(decision: GateDecision) -> &'static str {
    match decision {
        GateDecision::Skip => "skip",
        GateDecision::Delegate => "delegate",
    }
}

impl JsonFormatter {
    fn gate_to_json<'a>(&self, report: &'a GateReport) -> JsonGate<'a> {
        let mut gate = JsonGate {
            app: report.app().as_str(),
            result: "failed",
            versions: report.status(),
            action: None,
            failure: None,
            error: None,
        };

        match report {
            GateReport::Completed(outcome) => {
                gate.result = decision_label(outcome.decision);
                gate.action = outcome.action.as_ref();
            }
            GateReport::Decided { decision, .. } => {
                gate.result = decision_label(*decision);
            }
            GateReport::Failed { kind, message, .. } => {
                gate.failure = Some(*kind);
                gate.error = Some(message.as_str());
            }
        }

        // Quiet output keeps version details only for failures
        if self.verbosity == Verbosity::Quiet && gate.failure.is_none() {
            gate.versions = None;
        }
        gate
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            check_only: result.check_only,
            summary: JsonSummary {
                skipped: result.skipped(),
                delegated: result.delegated(),
                failed: result.failed(),
                exit_code: result.exit_code(),
            },
            gates: result.reports.iter().map(|r| self.gate_to_json(r)).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
