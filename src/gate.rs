//! Version gate: run a delegated action only when a newer version exists
//!
//! The gate awaits a version-currency check for an application identifier
//! and selects one of two branches:
//! - current: emit the skip diagnostic and do nothing else
//! - outdated: invoke the delegated action exactly once
//!
//! A failed check is an error, never treated as "outdated".

use crate::action::DelegatedAction;
use crate::domain::{AppId, GateDecision, GateOutcome, VersionStatus};
use crate::error::{ActionError, AppError};
use async_trait::async_trait;
use thiserror::Error;

/// Collaborator answering "is the known version already the latest?"
#[async_trait]
pub trait VersionCheck: Send + Sync {
    /// Compare the known version of `app` against the latest one
    async fn check(&self, app: &AppId) -> Result<VersionStatus, AppError>;

    /// `true` when no newer version of `app` exists
    async fn is_current_version(&self, app: &AppId) -> Result<bool, AppError> {
        Ok(self.check(app).await?.is_current)
    }
}

/// Sink for the gate's human-readable diagnostics
pub trait GateLog {
    /// Emit one diagnostic line
    fn log(&mut self, message: &str);
}

/// Diagnostics collected in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    pub messages: Vec<String>,
}

impl GateLog for MemoryLog {
    fn log(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Errors surfaced by a gate evaluation
#[derive(Error, Debug)]
pub enum GateError {
    /// The version-currency check failed; the action was not invoked
    #[error("version check for {app} failed: {source}")]
    Check {
        app: AppId,
        #[source]
        source: AppError,
    },

    /// The action was invoked once and failed
    #[error("delegated action for {app} failed: {source}")]
    Action {
        app: AppId,
        status: VersionStatus,
        #[source]
        source: ActionError,
    },
}

impl GateError {
    /// Application identifier of the failed gate
    pub fn app(&self) -> &AppId {
        match self {
            GateError::Check { app, .. } | GateError::Action { app, .. } => app,
        }
    }
}

/// Diagnostic emitted on the skip branch
pub fn skip_message(app: &AppId) -> String {
    format!("Did not detect a new version of {}, skipping test.", app)
}

/// Diagnostic emitted before the delegated action runs
pub fn run_message(app: &AppId) -> String {
    format!("Detected a new version of {}, running test.", app)
}

/// Gate over a version-currency check
pub struct VersionGate<'a> {
    check: &'a dyn VersionCheck,
}

impl<'a> VersionGate<'a> {
    /// Create a gate backed by `check`
    pub fn new(check: &'a dyn VersionCheck) -> Self {
        Self { check }
    }

    /// Run the check and pick a branch without acting on it
    pub async fn decide(&self, app: &AppId) -> Result<(GateDecision, VersionStatus), GateError> {
        let status = self
            .check
            .check(app)
            .await
            .map_err(|source| GateError::Check {
                app: app.clone(),
                source,
            })?;

        let decision = GateDecision::from_currency(status.is_current);
        tracing::debug!(
            app = %app,
            local = %status.local,
            latest = %status.latest,
            %decision,
            "version gate decided"
        );
        Ok((decision, status))
    }

    /// Run the check, then either skip or invoke `action` once
    pub async fn evaluate(
        &self,
        app: &AppId,
        action: &mut dyn DelegatedAction,
        log: &mut dyn GateLog,
    ) -> Result<GateOutcome, GateError> {
        let (decision, status) = self.decide(app).await?;
        act(app, decision, status, action, log)
    }
}

/// Carry out a decision taken by [`VersionGate::decide`]
pub fn act(
    app: &AppId,
    decision: GateDecision,
    status: VersionStatus,
    action: &mut dyn DelegatedAction,
    log: &mut dyn GateLog,
) -> Result<GateOutcome, GateError> {
    match decision {
        GateDecision::Skip => {
            log.log(&skip_message(app));
            Ok(GateOutcome::skipped(app.clone(), status))
        }
        GateDecision::Delegate => {
            log.log(&run_message(app));
            match action.run() {
                Ok(result) => Ok(GateOutcome::delegated(app.clone(), status, Some(result))),
                Err(source) => Err(GateError::Action {
                    app: app.clone(),
                    status,
                    source,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionResult;
    use crate::domain::LocalSource;
    use crate::error::RegistryError;

    /// Mock version check answering with a fixed result
    enum MockCheck {
        Current,
        Outdated,
        Fails,
    }

    #[async_trait]
    impl VersionCheck for MockCheck {
        async fn check(&self, _app: &AppId) -> Result<VersionStatus, AppError> {
            match self {
                MockCheck::Current => Ok(VersionStatus::new("1.0.0", LocalSource::Installed, "1.0.0")),
                MockCheck::Outdated => {
                    Ok(VersionStatus::new("1.0.0", LocalSource::Installed, "1.1.0"))
                }
                MockCheck::Fails => Err(RegistryError::network_error(
                    "@bdelab/roar-letter",
                    "npm",
                    "connection refused",
                )
                .into()),
            }
        }
    }

    /// Action that counts its invocations
    #[derive(Default)]
    struct CountingAction {
        calls: usize,
        fail: bool,
    }

    impl DelegatedAction for CountingAction {
        fn run(&mut self) -> Result<ActionResult, ActionError> {
            self.calls += 1;
            if self.fail {
                Err(ActionError::Failed {
                    command: "playLetter".to_string(),
                    code: Some(1),
                })
            } else {
                Ok(ActionResult::completed("playLetter"))
            }
        }
    }

    fn letter() -> AppId {
        AppId::new("@bdelab/roar-letter").unwrap()
    }

    #[tokio::test]
    async fn test_current_version_skips_with_one_message() {
        let gate = VersionGate::new(&MockCheck::Current);
        let mut action = CountingAction::default();
        let mut log = MemoryLog::default();

        let outcome = gate.evaluate(&letter(), &mut action, &mut log).await.unwrap();

        assert_eq!(outcome.decision, GateDecision::Skip);
        assert_eq!(action.calls, 0);
        assert_eq!(
            log.messages,
            vec!["Did not detect a new version of @bdelab/roar-letter, skipping test."]
        );
        assert!(!outcome.ran_action());
    }

    #[tokio::test]
    async fn test_new_version_runs_action_once() {
        let gate = VersionGate::new(&MockCheck::Outdated);
        let mut action = CountingAction::default();
        let mut log = MemoryLog::default();

        let outcome = gate.evaluate(&letter(), &mut action, &mut log).await.unwrap();

        assert_eq!(outcome.decision, GateDecision::Delegate);
        assert_eq!(action.calls, 1);
        assert!(outcome.ran_action());
        assert!(!log.messages.iter().any(|m| m.contains("skipping test")));
        assert_eq!(
            log.messages,
            vec!["Detected a new version of @bdelab/roar-letter, running test."]
        );
    }

    #[tokio::test]
    async fn test_failed_check_does_not_run_action() {
        let gate = VersionGate::new(&MockCheck::Fails);
        let mut action = CountingAction::default();
        let mut log = MemoryLog::default();

        let err = gate
            .evaluate(&letter(), &mut action, &mut log)
            .await
            .unwrap_err();

        assert!(matches!(err, GateError::Check { .. }));
        assert_eq!(err.app(), &letter());
        assert_eq!(action.calls, 0);
        assert!(log.messages.is_empty());
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_failed_action_propagates_after_single_call() {
        let gate = VersionGate::new(&MockCheck::Outdated);
        let mut action = CountingAction {
            fail: true,
            ..Default::default()
        };
        let mut log = MemoryLog::default();

        let err = gate
            .evaluate(&letter(), &mut action, &mut log)
            .await
            .unwrap_err();

        assert_eq!(action.calls, 1);
        match err {
            GateError::Action { status, .. } => assert_eq!(status.latest, "1.1.0"),
            other => panic!("expected action error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_is_current_version_follows_status() {
        assert!(MockCheck::Current.is_current_version(&letter()).await.unwrap());
        assert!(!MockCheck::Outdated.is_current_version(&letter()).await.unwrap());
        assert!(MockCheck::Fails.is_current_version(&letter()).await.is_err());
    }

    #[tokio::test]
    async fn test_decision_is_deterministic() {
        let gate = VersionGate::new(&MockCheck::Outdated);
        for _ in 0..5 {
            let (decision, _) = gate.decide(&letter()).await.unwrap();
            assert_eq!(decision, GateDecision::Delegate);
        }
    }

    #[tokio::test]
    async fn test_closure_action_through_gate() {
        let gate = VersionGate::new(&MockCheck::Outdated);
        let mut calls = 0;
        let mut action = || -> Result<ActionResult, ActionError> {
            calls += 1;
            Ok(ActionResult::completed("playLetter"))
        };
        let mut log = MemoryLog::default();

        gate.evaluate(&letter(), &mut action, &mut log).await.unwrap();
        drop(action);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_messages_interpolate_app() {
        let app = AppId::new("@bdelab/roar-sre").unwrap();
        assert_eq!(
            skip_message(&app),
            "Did not detect a new version of @bdelab/roar-sre, skipping test."
        );
        assert_eq!(
            run_message(&app),
            "Detected a new version of @bdelab/roar-sre, running test."
        );
    }
}
