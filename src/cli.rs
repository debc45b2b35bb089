//! CLI argument parsing module for verguard

use crate::domain::AppId;
use clap::Parser;
use std::path::PathBuf;

/// Run a command only when a newer version of an npm package is published
#[derive(Parser, Debug, Clone)]
#[command(
    name = "verguard",
    version,
    about = "Run a command only when a newer npm package version is published",
    after_help = "Example:\n  verguard --app @bdelab/roar-letter -- npx cypress run --spec cypress/e2e/playLetter.cy.js"
)]
pub struct CliArgs {
    /// Package to check (e.g. @bdelab/roar-letter)
    #[arg(long, required_unless_present = "config", conflicts_with = "config")]
    pub app: Option<AppId>,

    /// Gate file listing several gates
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Node project root used to find the local version [default: .]
    ///
    /// Overrides `project` in the gate file.
    #[arg(long, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Registry base URL
    #[arg(long, env = "VERGUARD_REGISTRY")]
    pub registry: Option<String>,

    /// Dist-tag to compare against (default: latest)
    #[arg(long)]
    pub tag: Option<String>,

    /// Known version of the package, instead of looking it up
    #[arg(long, value_name = "VERSION", requires = "app")]
    pub current: Option<String>,

    /// Report the decision without running any command
    #[arg(long)]
    pub check_only: bool,

    /// Ignore HTTP(S)_PROXY settings when talking to the registry
    #[arg(long)]
    pub no_proxy: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Command to run when a newer version exists
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl CliArgs {
    /// Whether progress spinners should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
