//! Gate decision and outcome types

use super::{AppId, VersionStatus};
use crate::action::ActionResult;
use serde::Serialize;
use std::fmt;

/// Branch selected by the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// No newer version: the delegated action is not run
    Skip,
    /// A newer version exists: the delegated action runs once
    Delegate,
}

impl GateDecision {
    /// Select the branch for a version-currency result
    pub fn from_currency(is_current: bool) -> Self {
        if is_current {
            GateDecision::Skip
        } else {
            GateDecision::Delegate
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateDecision::Skip => write!(f, "skipped"),
            GateDecision::Delegate => write!(f, "delegated"),
        }
    }
}

/// Result of evaluating one gate
#[derive(Debug, Clone, Serialize)]
pub struct GateOutcome {
    /// Application identifier that was checked
    pub app: AppId,
    /// Branch taken
    pub decision: GateDecision,
    /// Version details behind the decision
    pub status: VersionStatus,
    /// Result of the delegated action, when it ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionResult>,
}

impl GateOutcome {
    /// Outcome for the skip branch
    pub fn skipped(app: AppId, status: VersionStatus) -> Self {
        Self {
            app,
            decision: GateDecision::Skip,
            status,
            action: None,
        }
    }

    /// Outcome for the delegate branch
    pub fn delegated(app: AppId, status: VersionStatus, action: Option<ActionResult>) -> Self {
        Self {
            app,
            decision: GateDecision::Delegate,
            status,
            action,
        }
    }

    /// Whether the delegated action was invoked
    pub fn ran_action(&self) -> bool {
        self.action.is_some()
    }
}
