//! `sealctl`: seal and open envelopes from the command line.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging (stderr).
//! 4. Run the subcommand against stdin/stdout.

mod commands;
mod config;
mod key;
mod telemetry;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use crate::commands::Command;
use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "sealctl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let stdin = io::stdin();
    let stdout = io::stdout();
    commands::run(&cli.command, &cfg, &mut stdin.lock(), &mut stdout.lock()).map_err(|e| {
        error!(error = %format!("{e:#}"), "command failed");
        e
    })
}
