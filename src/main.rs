//! rankdeploy CLI - deploy the crypto-rank-tracker function and its scheduler job
//!
//! Usage: rankdeploy <COMMAND>
//!
//! Commands:
//!   deploy        Export requirements, deploy the function, re-create the job
//!   plan          Print the cloud commands a deploy would run
//!   requirements  Export requirements.txt from the lockfile
//!   schedule      Re-create the scheduler job only
//!   status        Show the deployed function URI and scheduler job
//!   check         Diagnose configuration before a deploy
//!   workflow      Render the GitHub Actions workflow

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands};
use commands::requirements::RequirementsArgs;
use commands::Session;
use ui::context::UiContext;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    if let Err(err) = run(cli) {
        ui::error::print_error(&err, json);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            cancel.store(true, Ordering::SeqCst);
        }) {
            tracing::warn!(error = %e, "cannot install the interrupt handler");
        }
    }

    let ui = UiContext::new(cli.json, cli.verbose);
    let session = Session::load(
        ui,
        cli.project_root.as_deref(),
        cli.config.as_deref(),
        cancel,
    )?;

    match cli.command {
        Commands::Deploy { yes, dry_run } => commands::deploy::cmd_deploy(&session, yes, dry_run),
        Commands::Plan => commands::plan::cmd_plan(&session),
        Commands::Requirements {
            lockfile,
            output,
            extras,
        } => commands::requirements::cmd_requirements(
            &session,
            RequirementsArgs {
                lockfile,
                output,
                extras,
            },
        ),
        Commands::Schedule { yes } => commands::schedule::cmd_schedule(&session, yes),
        Commands::Status => commands::status::cmd_status(&session),
        Commands::Check { strict_warnings } => {
            commands::check::cmd_check(&session, strict_warnings)
        }
        Commands::Workflow { branch, output } => {
            commands::workflow::cmd_workflow(&session, branch, output)
        }
    }
}
