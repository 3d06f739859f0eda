//! Turning one run of a sweep into a validated training invocation.

use crate::contract::{ArgumentContract, TrainConfig, flags};
use crate::error::{ContractResult, TrainingResult};
use crate::layout::OutputLayout;
use crate::options::{OptionMap, OptionValue};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::sweep::RunSpec;
use crate::trainer::Trainer;

/// Iterations per prefill step; prefill is `num_iterations / PREFILL_DIVISOR`, floored.
pub const PREFILL_DIVISOR: u64 = 100;

#[must_use]
pub fn prefill_for(num_iterations: u64) -> u64 {
    num_iterations / PREFILL_DIVISOR
}

/// A run translated into tokens and parsed by the contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub run: RunSpec,
    pub seed: u64,
    pub tokens: Vec<String>,
    pub config: TrainConfig,
}

#[derive(Debug, Clone, Default)]
pub struct InvocationBuilder {
    contract: ArgumentContract,
    layout: OutputLayout,
    base_options: OptionMap,
}

impl InvocationBuilder {
    #[must_use]
    pub fn new(contract: ArgumentContract, layout: OutputLayout) -> Self {
        Self { contract, layout, base_options: OptionMap::new() }
    }

    /// Options placed ahead of the derived ones; a derived option with the same flag wins.
    #[must_use]
    pub fn with_base_options<'a, I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a OptionValue)>,
    {
        for (flag, value) in options {
            self.base_options.insert(flag.clone(), value.clone());
        }
        self
    }

    pub fn contract(&self) -> &ArgumentContract {
        &self.contract
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Base options first, then the derived ones in contract order.
    ///
    /// A base option that is also derived is dropped, so graph fields always
    /// follow their selector.
    pub fn option_map(&self, run: &RunSpec, seed: u64, num_iterations: u64) -> OptionMap {
        let derived = OptionMap::new()
            .with(flags::NUM_ITERATIONS, num_iterations)
            .with(flags::PREFILL, prefill_for(num_iterations))
            .with(flags::OUTPUT_FOLDER, self.layout.run_dir(run, seed))
            .with(flags::SEED, seed)
            .with(flags::ERDOS_RENYI_LINGAUSS, true)
            .with(flags::NUM_VARIABLES, run.num_variables)
            .with(flags::NUM_EDGES, run.num_edges)
            .with(flags::NUM_SAMPLES, run.data_size);

        let mut options = self.base_options.clone();
        for (flag, _) in derived.iter() {
            options.remove(flag);
        }
        for (flag, value) in derived.iter() {
            options.insert(flag, value.clone());
        }
        options
    }

    /// Translate and validate; nothing is launched.
    pub fn build(&self, run: RunSpec, seed: u64, num_iterations: u64) -> ContractResult<Invocation> {
        let options = self.option_map(&run, seed, num_iterations);
        let tokens = options.to_tokens();
        let config = self.contract.parse_tokens(&tokens)?;
        Ok(Invocation { run, seed, tokens, config })
    }

    /// Build, announce, then wait for the trainer to finish.
    pub async fn invoke(
        &self,
        run: RunSpec,
        seed: u64,
        num_iterations: u64,
        trainer: &dyn Trainer,
        progress: &dyn ProgressSink,
    ) -> TrainingResult<()> {
        let invocation = self.build(run, seed, num_iterations)?;
        launch(&invocation, trainer, progress).await
    }
}

pub(crate) async fn launch(
    invocation: &Invocation,
    trainer: &dyn Trainer,
    progress: &dyn ProgressSink,
) -> TrainingResult<()> {
    let Invocation { run, seed, config, .. } = invocation;
    progress.on_event(ProgressEvent::Launching {
        run: *run,
        seed: *seed,
        output_folder: config.output_folder.clone(),
    });
    tracing::info!(
        num_variables = run.num_variables,
        num_edges = run.num_edges,
        data_size = run.data_size,
        seed = *seed,
        trainer = trainer.id(),
        "launching run"
    );
    tracing::debug!(tokens = ?invocation.tokens, "run tokens");

    trainer.train(config).await.inspect_err(|e| {
        tracing::warn!(%run, seed = *seed, error = %e, "run failed");
    })?;

    progress.on_event(ProgressEvent::Finished { run: *run, seed: *seed });
    Ok(())
}
