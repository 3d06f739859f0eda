//! Dagsweep CLI - command-line driver for structure-learning training sweeps
//!
//! This CLI provides a `dagsweep` command that expands a sweep file into
//! training invocations, validates them against the training entry point's
//! argument contract, and launches them one after another.

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use commands::types::{SweepArgs, TrainerArgs};
use commands::{contract, plan, sweep, train};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Dagsweep CLI - training sweeps for DAG structure learning
///
/// Expands a sweep over variable counts, edge counts and data sizes into
/// fully specified training invocations with collision-free output folders.
#[derive(Parser, Debug)]
#[command(
    name = "dagsweep",
    author,
    version,
    about = "Dagsweep - training sweeps for DAG structure learning",
    long_about = "Dagsweep expands a declarative sweep description into training invocations.\nEach invocation is validated against the training argument contract before anything is launched."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Driver configuration file (skips dagsweep.toml discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every invocation of a sweep
    ///
    /// Plans and validates the whole sweep first, then launches the runs one
    /// at a time. The first failing run stops the sweep.
    Sweep {
        #[command(flatten)]
        sweep: SweepArgs,

        #[command(flatten)]
        trainer: TrainerArgs,
    },

    /// Show the invocations a sweep would launch
    Plan {
        #[command(flatten)]
        sweep: SweepArgs,

        /// Output the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Launch a single run from raw training arguments
    ///
    /// Everything after `--` is parsed by the training argument contract,
    /// e.g. `dagsweep train --dry-run -- --seed 1 erdos_renyi_lingauss
    /// --num_variables 10 --num_edges 5 --num_samples 100`.
    Train {
        #[command(flatten)]
        trainer: TrainerArgs,

        /// Training arguments
        #[arg(last = true)]
        tokens: Vec<String>,
    },

    /// Describe the training argument contract
    Contract {
        /// Output the option list as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let driver_config = config::load_config(args.config.as_deref())?;

    // Initialize tracing
    let log_level = args.log_level.as_deref().or(driver_config.log_level.as_deref()).unwrap_or("info");
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // If no command provided, show help
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Sweep { sweep: sweep_args, trainer } => {
            sweep::execute(sweep_args, trainer, &driver_config).await?;
        }
        Command::Plan { sweep: sweep_args, json } => {
            plan::execute(&sweep_args, json, &driver_config)?;
        }
        Command::Train { trainer, tokens } => {
            train::execute(tokens, trainer, &driver_config).await?;
        }
        Command::Contract { json } => {
            contract::execute(json)?;
        }
    }

    Ok(())
}
