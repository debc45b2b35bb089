//! Gate runner coordinating one invocation
//!
//! This module provides:
//! - Gate plans built from CLI arguments or a gate file
//! - Sequential evaluation: check → decide → skip or run
//! - Check-only mode
//! - Error handling with continuation to the next gate

use crate::action::CommandAction;
use crate::check::{RegistryVersionCheck, DEFAULT_TAG};
use crate::cli::CliArgs;
use crate::config::GateFile;
use crate::domain::{AppId, GateDecision, GateOutcome, VersionStatus};
use crate::error::{AppError, ConfigError};
use crate::gate::{act, GateError, GateLog, VersionCheck, VersionGate};
use crate::progress::Progress;
use crate::registry::{HttpClient, NpmAdapter, NPM_REGISTRY_URL};
use serde::Serialize;
use std::path::PathBuf;

/// Project root when neither `--project` nor the gate file names one
const DEFAULT_PROJECT: &str = ".";

/// One gate to evaluate
#[derive(Debug, Clone)]
pub struct GatePlan {
    /// Package whose version is checked
    pub app: AppId,
    /// Command run when a newer version exists
    pub command: Vec<String>,
    /// Known version override
    pub current: Option<String>,
    /// Dist-tag for this gate
    pub tag: String,
    /// Working directory of the command
    pub workdir: PathBuf,
}

/// Settings shared by all gates of one invocation
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Node project root
    pub project: PathBuf,
    /// Registry base URL
    pub registry: String,
    /// Report decisions without running commands
    pub check_only: bool,
    /// Bypass system proxy settings
    pub no_proxy: bool,
    /// Route command stdout to stderr (stdout carries the JSON report)
    pub stdout_to_stderr: bool,
}

/// Why a gate failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The version check failed; the command did not run
    Check,
    /// The command ran and failed
    Action,
}

/// Report for one gate
#[derive(Debug, Clone)]
pub enum GateReport {
    /// The gate skipped or ran its command successfully
    Completed(GateOutcome),
    /// Check-only mode: the decision that would have been taken
    Decided {
        app: AppId,
        decision: GateDecision,
        status: VersionStatus,
    },
    /// The gate failed
    Failed {
        app: AppId,
        kind: FailureKind,
        status: Option<VersionStatus>,
        message: String,
    },
}

impl GateReport {
    /// Application identifier of this report
    pub fn app(&self) -> &AppId {
        match self {
            GateReport::Completed(outcome) => &outcome.app,
            GateReport::Decided { app, .. } | GateReport::Failed { app, .. } => app,
        }
    }

    /// Version details, when the check got that far
    pub fn status(&self) -> Option<&VersionStatus> {
        match self {
            GateReport::Completed(outcome) => Some(&outcome.status),
            GateReport::Decided { status, .. } => Some(status),
            GateReport::Failed { status, .. } => status.as_ref(),
        }
    }

    fn from_error(error: GateError) -> Self {
        let message = error.to_string();
        match error {
            GateError::Check { app, .. } => GateReport::Failed {
                app,
                kind: FailureKind::Check,
                status: None,
                message,
            },
            GateError::Action { app, status, .. } => GateReport::Failed {
                app,
                kind: FailureKind::Action,
                status: Some(status),
                message,
            },
        }
    }
}

/// Result of running the orchestrator
#[derive(Debug, Clone, Default)]
pub struct OrchestratorResult {
    /// Reports in evaluation order
    pub reports: Vec<GateReport>,
    /// Whether commands were suppressed
    pub check_only: bool,
}

impl OrchestratorResult {
    /// Number of gates that skipped their command
    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| match r {
                GateReport::Completed(o) => o.decision == GateDecision::Skip,
                GateReport::Decided { decision, .. } => *decision == GateDecision::Skip,
                GateReport::Failed { .. } => false,
            })
            .count()
    }

    /// Number of gates that ran (or would run) their command
    pub fn delegated(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| match r {
                GateReport::Completed(o) => o.decision == GateDecision::Delegate,
                GateReport::Decided { decision, .. } => *decision == GateDecision::Delegate,
                GateReport::Failed { kind, .. } => *kind == FailureKind::Action,
            })
            .count()
    }

    /// Number of failed gates
    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r, GateReport::Failed { .. }))
            .count()
    }

    /// Process exit code: 2 for a failed check, 1 for a failed command, else 0
    pub fn exit_code(&self) -> u8 {
        let kinds = self.reports.iter().filter_map(|r| match r {
            GateReport::Failed { kind, .. } => Some(*kind),
            _ => None,
        });

        kinds.fold(0, |code, kind| match kind {
            FailureKind::Check => 2,
            FailureKind::Action => code.max(1),
        })
    }
}

/// Orchestrator for one invocation
pub struct Orchestrator {
    plans: Vec<GatePlan>,
    settings: RunSettings,
    client: HttpClient,
}

impl Orchestrator {
    /// Build the orchestrator from CLI arguments (and the gate file they name)
    pub fn from_args(args: &CliArgs) -> Result<Self, AppError> {
        let (plans, settings) = match &args.config {
            Some(path) => Self::plans_from_file(args, &GateFile::load(path)?)?,
            None => Self::plans_from_args(args)?,
        };

        let client = if settings.no_proxy {
            HttpClient::direct()?
        } else {
            HttpClient::new()?
        };

        Ok(Self::with_client(plans, settings, client))
    }

    /// Build the orchestrator from explicit parts
    pub fn with_client(plans: Vec<GatePlan>, settings: RunSettings, client: HttpClient) -> Self {
        Self {
            plans,
            settings,
            client,
        }
    }

    /// Gates in evaluation order
    pub fn plans(&self) -> &[GatePlan] {
        &self.plans
    }

    fn plans_from_args(args: &CliArgs) -> Result<(Vec<GatePlan>, RunSettings), ConfigError> {
        let app = args.app.clone().ok_or_else(|| ConfigError::ConflictingOptions {
            message: "either --app or --config is required".to_string(),
        })?;

        if args.command.is_empty() && !args.check_only {
            return Err(ConfigError::MissingCommand {
                app: app.to_string(),
            });
        }

        let project = args
            .project
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT));

        let plan = GatePlan {
            app,
            command: args.command.clone(),
            current: args.current.clone(),
            tag: args.tag.clone().unwrap_or_else(|| DEFAULT_TAG.to_string()),
            workdir: project.clone(),
        };

        let settings = RunSettings {
            project,
            registry: args
                .registry
                .clone()
                .unwrap_or_else(|| NPM_REGISTRY_URL.to_string()),
            check_only: args.check_only,
            no_proxy: args.no_proxy,
            stdout_to_stderr: args.json,
        };

        Ok((vec![plan], settings))
    }

    fn plans_from_file(
        args: &CliArgs,
        file: &GateFile,
    ) -> Result<(Vec<GatePlan>, RunSettings), ConfigError> {
        if !args.command.is_empty() {
            return Err(ConfigError::ConflictingOptions {
                message: "a trailing command cannot be combined with --config".to_string(),
            });
        }

        // Command line beats the gate file, which beats the default
        let project = args
            .project
            .clone()
            .or_else(|| file.project.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT));
        let default_tag = args
            .tag
            .clone()
            .or_else(|| file.tag.clone())
            .unwrap_or_else(|| DEFAULT_TAG.to_string());

        let mut plans = Vec::with_capacity(file.gates.len());
        for gate in &file.gates {
            if gate.command.is_empty() && !args.check_only {
                return Err(ConfigError::MissingCommand {
                    app: gate.app.to_string(),
                });
            }

            plans.push(GatePlan {
                app: gate.app.clone(),
                command: gate.command.clone(),
                current: gate.current.clone(),
                tag: gate.tag.clone().unwrap_or_else(|| default_tag.clone()),
                workdir: match &gate.workdir {
                    Some(dir) => project.join(dir),
                    None => project.clone(),
                },
            });
        }

        let registry = args
            .registry
            .clone()
            .or_else(|| file.registry.clone())
            .unwrap_or_else(|| NPM_REGISTRY_URL.to_string());

        let settings = RunSettings {
            project,
            registry,
            check_only: args.check_only,
            no_proxy: args.no_proxy,
            stdout_to_stderr: args.json,
        };

        Ok((plans, settings))
    }

    fn version_check(&self, plan: &GatePlan) -> Result<RegistryVersionCheck, ConfigError> {
        let adapter = NpmAdapter::with_registry(self.client.clone(), &self.settings.registry)?;
        let mut check = RegistryVersionCheck::new(Box::new(adapter), &self.settings.project)
            .with_tag(plan.tag.clone());
        if let Some(current) = &plan.current {
            check = check.with_override(plan.app.clone(), current.clone());
        }
        Ok(check)
    }

    /// Evaluate every gate in order
    pub async fn run(&self, log: &mut dyn GateLog, show_progress: bool) -> OrchestratorResult {
        let mut progress = Progress::new(show_progress);
        let mut result = OrchestratorResult {
            reports: Vec::with_capacity(self.plans.len()),
            check_only: self.settings.check_only,
        };

        for plan in &self.plans {
            let report = match self.version_check(plan) {
                Ok(check) => self.run_gate(plan, &check, log, &mut progress).await,
                Err(e) => GateReport::from_error(GateError::Check {
                    app: plan.app.clone(),
                    source: e.into(),
                }),
            };

            if let GateReport::Failed { message, .. } = &report {
                tracing::error!(app = %plan.app, "{}", message);
            }
            result.reports.push(report);
        }

        result
    }

    /// Evaluate one gate against the given check
    pub async fn run_gate(
        &self,
        plan: &GatePlan,
        check: &dyn VersionCheck,
        log: &mut dyn GateLog,
        progress: &mut Progress,
    ) -> GateReport {
        let gate = VersionGate::new(check);

        progress.spinner(&format!("Checking {} ({})...", plan.app, plan.tag));
        let decided = gate.decide(&plan.app).await;
        progress.finish_and_clear();

        let (decision, status) = match decided {
            Ok(decided) => decided,
            Err(e) => return GateReport::from_error(e),
        };

        if self.settings.check_only {
            return GateReport::Decided {
                app: plan.app.clone(),
                decision,
                status,
            };
        }

        // Commands are validated when plans are built; only check-only plans may lack one
        let Some(action) = CommandAction::new(plan.command.clone(), &plan.workdir) else {
            return GateReport::from_error(GateError::Check {
                app: plan.app.clone(),
                source: ConfigError::MissingCommand {
                    app: plan.app.to_string(),
                }
                .into(),
            });
        };

        let mut action = action.with_stdout_to_stderr(self.settings.stdout_to_stderr);
        match act(&plan.app, decision, status, &mut action, log) {
            Ok(outcome) => GateReport::Completed(outcome),
            Err(e) => GateReport::from_error(e),
        }
    }
}
