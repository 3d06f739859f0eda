use crate::contract::TrainConfig;
use crate::error::TrainingResult;
use async_trait::async_trait;

/// The training entry point, seen from the sweep.
///
/// `train` returns only once the run has completed or failed; the sweep never
/// overlaps two calls.
#[async_trait]
pub trait Trainer: Send + Sync {
    fn id(&self) -> &'static str;

    async fn train(&self, config: &TrainConfig) -> TrainingResult<()>;
}

/// Prints the command line each run would receive and launches nothing.
#[derive(Debug, Default)]
pub struct DryRunTrainer;

#[async_trait]
impl Trainer for DryRunTrainer {
    fn id(&self) -> &'static str {
        "dry-run"
    }

    async fn train(&self, config: &TrainConfig) -> TrainingResult<()> {
        let line = config.to_tokens().join(" ");
        tracing::debug!(output_folder = %config.output_folder.display(), "dry run");
        println!("train {line}");
        Ok(())
    }
}
