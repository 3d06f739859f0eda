//! Sweep command implementation.

use super::types::{SweepArgs, TrainerArgs};
use super::{prepare_sweep, select_trainer};
use anyhow::{Context, Result};
use colored::Colorize;
use dagsweep_training::{DriverConfig, StdoutProgressSink, run_sweep};

pub async fn execute(args: SweepArgs, trainer_args: TrainerArgs, config: &DriverConfig) -> Result<()> {
    let prepared = prepare_sweep(&args, config)?;
    let trainer = select_trainer(trainer_args, config)?;

    let summary = run_sweep(
        &prepared.sweep,
        &prepared.builder,
        &prepared.settings,
        trainer.as_ref(),
        &StdoutProgressSink,
    )
    .await
    .with_context(|| format!("Sweep {} aborted", args.sweep_file.display()))?;

    println!();
    println!("{}", "Sweep complete".bold().green());
    println!("  Runs: {}", summary.completed.to_string().cyan());
    println!("  Output: {}", prepared.builder.layout().root().display().to_string().dimmed());
    println!();
    Ok(())
}
