//! Sequential execution of a whole sweep.

use crate::error::{SweepError, TrainingResult};
use crate::invocation::{Invocation, InvocationBuilder, launch};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::sweep::SweepConfig;
use crate::trainer::Trainer;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUM_ITERATIONS: u64 = 100_000;

/// Caller-supplied values shared by every run of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSettings {
    pub seeds: Vec<u64>,
    pub num_iterations: u64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self { seeds: vec![0], num_iterations: DEFAULT_NUM_ITERATIONS }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SweepSummary {
    pub completed: usize,
}

/// Build and validate every invocation of the sweep.
///
/// Runs are ordered by the sweep enumeration with seeds innermost. Any shape or
/// contract error aborts planning, so nothing is launched for a broken sweep.
pub fn plan_sweep(
    sweep: &SweepConfig,
    builder: &InvocationBuilder,
    settings: &SweepSettings,
) -> TrainingResult<Vec<Invocation>> {
    if settings.seeds.is_empty() {
        return Err(SweepError::NoSeeds.into());
    }
    sweep.validate()?;

    let mut plan = Vec::new();
    for run in sweep.runs() {
        let run = run?;
        for &seed in &settings.seeds {
            plan.push(builder.build(run, seed, settings.num_iterations)?);
        }
    }
    Ok(plan)
}

/// Plan the sweep, then run each invocation to completion, one at a time.
///
/// The first trainer failure stops the sweep and is returned.
pub async fn run_sweep(
    sweep: &SweepConfig,
    builder: &InvocationBuilder,
    settings: &SweepSettings,
    trainer: &dyn Trainer,
    progress: &dyn ProgressSink,
) -> TrainingResult<SweepSummary> {
    let plan = plan_sweep(sweep, builder, settings)?;
    tracing::info!(runs = plan.len(), seeds = settings.seeds.len(), trainer = trainer.id(), "sweep planned");
    progress.on_event(ProgressEvent::SweepStarted { total: plan.len() });

    let mut summary = SweepSummary::default();
    for invocation in &plan {
        launch(invocation, trainer, progress).await?;
        summary.completed += 1;
    }

    progress.on_event(ProgressEvent::SweepFinished { completed: summary.completed });
    Ok(summary)
}
