//! Trainer backed by an external program.

use crate::contract::TrainConfig;
use crate::error::{TrainingError, TrainingResult};
use crate::layout::OutputLayout;
use crate::trainer::Trainer;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What was launched for a run, written next to its outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationManifest {
    pub created_at: DateTime<Utc>,
    pub program: String,
    pub args: Vec<String>,
    pub tokens: Vec<String>,
    pub config: TrainConfig,
}

impl InvocationManifest {
    pub fn read(path: &Path) -> TrainingResult<Self> {
        Ok(serde_json::from_slice(&std::fs::read(path)?)?)
    }
}

/// Runs `<program> <args...> <tokens...>` and waits for it to exit.
#[derive(Debug, Clone)]
pub struct CommandTrainer {
    program: String,
    args: Vec<String>,
}

impl CommandTrainer {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new() }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn write_manifest(&self, config: &TrainConfig, tokens: &[String]) -> TrainingResult<()> {
        tokio::fs::create_dir_all(&config.output_folder).await?;
        let manifest = InvocationManifest {
            created_at: Utc::now(),
            program: self.program.clone(),
            args: self.args.clone(),
            tokens: tokens.to_vec(),
            config: config.clone(),
        };
        let path = OutputLayout::manifest_path(&config.output_folder);
        tokio::fs::write(&path, serde_json::to_string_pretty(&manifest)?).await?;
        Ok(())
    }
}

#[async_trait]
impl Trainer for CommandTrainer {
    fn id(&self) -> &'static str {
        "command"
    }

    async fn train(&self, config: &TrainConfig) -> TrainingResult<()> {
        let tokens = config.to_tokens();
        self.write_manifest(config, &tokens).await?;

        tracing::debug!(program = %self.program, tokens = ?tokens, "launching trainer");
        let status = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .args(&tokens)
            .status()
            .await
            .map_err(|e| TrainingError::Trainer(format!("failed to launch {}: {}", self.program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(TrainingError::Trainer(format!("{} exited with {}", self.program, status)))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::contract::ArgumentContract;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> TrainConfig {
        let out = dir.join("10_5_100_0");
        ArgumentContract::new()
            .parse_tokens([
                "--output_folder",
                out.to_str().unwrap(),
                "erdos_renyi_lingauss",
                "--num_variables",
                "10",
                "--num_edges",
                "5",
                "--num_samples",
                "100",
            ])
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_program_writes_manifest() {
        let temp = TempDir::new().unwrap();
        let config = config_in(temp.path());

        CommandTrainer::new("true").train(&config).await.unwrap();

        let manifest = InvocationManifest::read(&OutputLayout::manifest_path(&config.output_folder)).unwrap();
        assert_eq!(manifest.program, "true");
        assert_eq!(manifest.tokens, config.to_tokens());
        assert_eq!(manifest.config, config);
    }

    #[tokio::test]
    async fn test_failing_program_is_a_trainer_error() {
        let temp = TempDir::new().unwrap();
        let config = config_in(temp.path());

        let err = CommandTrainer::new("false").train(&config).await.unwrap_err();
        assert!(matches!(err, TrainingError::Trainer(_)));
    }

    #[tokio::test]
    async fn test_program_receives_tokens_after_fixed_args() {
        let temp = TempDir::new().unwrap();
        let config = config_in(temp.path());
        let capture = temp.path().join("argv.txt");

        // `sh -c script name args...` binds the tokens to $@.
        let script = format!("echo \"$@\" > {}", capture.display());
        CommandTrainer::new("sh")
            .with_args(["-c", script.as_str(), "train"])
            .train(&config)
            .await
            .unwrap();

        let argv = std::fs::read_to_string(&capture).unwrap();
        assert_eq!(argv.trim(), config.to_tokens().join(" "));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_trainer_error() {
        let temp = TempDir::new().unwrap();
        let config = config_in(temp.path());

        let err = CommandTrainer::new("dagsweep-no-such-program").train(&config).await.unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }
}
