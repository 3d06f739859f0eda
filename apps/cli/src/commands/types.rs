//! Command argument types shared between main.rs and the command modules.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Sweep file (.toml or .json)
    pub sweep_file: PathBuf,

    /// Seed to run for every sweep point (repeatable; overrides config)
    #[arg(long = "seed")]
    pub seeds: Vec<u64>,

    /// Iteration budget per run (overrides config)
    #[arg(long)]
    pub num_iterations: Option<u64>,

    /// Root folder for run outputs (overrides config)
    #[arg(long)]
    pub output_root: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TrainerArgs {
    /// Print each run's command line instead of launching it
    #[arg(long)]
    pub dry_run: bool,

    /// Training program to launch (overrides config)
    #[arg(long)]
    pub program: Option<String>,

    /// Argument placed before the run's tokens (repeatable)
    #[arg(long = "program-arg", requires = "program", allow_hyphen_values = true)]
    pub program_args: Vec<String>,
}
