//! verguard - run a command only when a newer npm package version is published
//!
//! Typical use gates an end-to-end suite on a package release:
//!
//! ```text
//! verguard --app @bdelab/roar-letter -- npx cypress run --spec cypress/e2e/playLetter.cy.js
//! ```

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use verguard::cli::CliArgs;
use verguard::orchestrator::Orchestrator;
use verguard::output::{create_formatter, ConsoleLog, OutputConfig};

/// Exit code for configuration errors, same as a failed check
const CONFIG_ERROR_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(CONFIG_ERROR_EXIT)
        }
    }
}

/// Install the stderr tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "verguard=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("verguard v{}", env!("CARGO_PKG_VERSION"));
        if let Some(project) = &args.project {
            eprintln!("Project: {}", project.display());
        }
        if args.check_only {
            eprintln!("Mode: check-only");
        }
    }

    let orchestrator = Orchestrator::from_args(&args)?;
    let mut log = ConsoleLog::new();
    let result = orchestrator.run(&mut log, args.show_progress()).await;

    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::from(result.exit_code()))
}
