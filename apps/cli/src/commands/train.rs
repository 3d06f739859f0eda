//! Train command implementation.
//!
//! Parses raw training arguments with the same contract the sweep uses and
//! hands the result to the selected trainer.

use super::select_trainer;
use super::types::TrainerArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use dagsweep_training::{ArgumentContract, ContractError, DriverConfig, Trainer};

pub async fn execute(tokens: Vec<String>, trainer_args: TrainerArgs, config: &DriverConfig) -> Result<()> {
    let contract = ArgumentContract::new();
    let train_config = match contract.parse_tokens(&tokens) {
        Ok(parsed) => parsed,
        Err(ContractError::Help(text)) => {
            print!("{text}");
            return Ok(());
        }
        Err(e) => return Err(e).context("Invalid training arguments"),
    };

    let trainer = select_trainer(trainer_args, config)?;
    tracing::info!(graph = train_config.graph.name(), seed = train_config.seed, "launching single run");
    trainer.train(&train_config).await?;

    println!("{} {}", "Run complete:".bold().green(), train_config.output_folder.display());
    Ok(())
}
