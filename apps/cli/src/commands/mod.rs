//! Command implementations for the Dagsweep CLI.

pub mod contract;
pub mod plan;
pub mod sweep;
pub mod train;
pub mod types;

use anyhow::Result;
use dagsweep_training::{
    ArgumentContract, CommandTrainer, DriverConfig, DryRunTrainer, InvocationBuilder, OutputLayout,
    SweepConfig, SweepSettings, Trainer,
};
use types::{SweepArgs, TrainerArgs};

/// Sweep file plus everything needed to turn it into invocations.
pub(crate) struct PreparedSweep {
    pub sweep: SweepConfig,
    pub builder: InvocationBuilder,
    pub settings: SweepSettings,
}

/// Load the sweep file and merge CLI overrides over the driver config.
pub(crate) fn prepare_sweep(args: &SweepArgs, config: &DriverConfig) -> Result<PreparedSweep> {
    let sweep = SweepConfig::load(&args.sweep_file)?;

    let mut settings = config.settings();
    if !args.seeds.is_empty() {
        settings.seeds.clone_from(&args.seeds);
    }
    if let Some(num_iterations) = args.num_iterations {
        settings.num_iterations = num_iterations;
    }
    let output_root = args.output_root.clone().unwrap_or_else(|| config.output_root());

    let builder = InvocationBuilder::new(ArgumentContract::new(), OutputLayout::new(output_root))
        .with_base_options(sweep.base_options());

    Ok(PreparedSweep { sweep, builder, settings })
}

/// Pick the trainer: dry run, CLI program, configured program, in that order.
pub(crate) fn select_trainer(args: TrainerArgs, config: &DriverConfig) -> Result<Box<dyn Trainer>> {
    if args.dry_run {
        return Ok(Box::new(DryRunTrainer));
    }
    if let Some(program) = args.program {
        return Ok(Box::new(CommandTrainer::new(program).with_args(args.program_args)));
    }
    if let Some(ref trainer) = config.trainer {
        return Ok(Box::new(CommandTrainer::new(trainer.program.clone()).with_args(trainer.args.clone())));
    }
    anyhow::bail!(
        "No trainer program configured. Pass --program, set [trainer] in dagsweep.toml, or use --dry-run."
    )
}
