//! Driver configuration file support.
//!
//! Holds the caller-supplied sweep settings (seeds, iteration budget, output
//! root) and the trainer program, so they need not be repeated on every
//! command line.

use crate::driver::{DEFAULT_NUM_ITERATIONS, SweepSettings};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Driver configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Seeds run for every sweep point
    #[serde(default)]
    pub seeds: Option<Vec<u64>>,

    /// Iteration budget per run
    #[serde(default)]
    pub num_iterations: Option<u64>,

    /// Root folder for run outputs
    #[serde(default)]
    pub output_root: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    /// External training program
    #[serde(default)]
    pub trainer: Option<TrainerConfig>,
}

/// External program invoked once per run, followed by the run's tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl DriverConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".dagsweep")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from("dagsweep.toml")
    }

    /// Discover and load configuration files.
    ///
    /// Loads configuration from:
    /// 1. Global config (~/.dagsweep/config.toml)
    /// 2. Local config (./dagsweep.toml)
    ///
    /// Local config overrides global config. Missing files are skipped; files that
    /// exist but fail to parse are reported.
    pub fn discover_and_load() -> ConfigResult<Self> {
        let mut config = Self::default();

        for path in [Self::default_global_path(), Self::default_local_path()] {
            match Self::load_from_file(&path) {
                Ok(found) => {
                    tracing::debug!(path = %path.display(), "loaded driver config");
                    config.merge(&found);
                }
                Err(ConfigError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }

        Ok(config)
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref seeds) = other.seeds {
            self.seeds = Some(seeds.clone());
        }
        if let Some(num_iterations) = other.num_iterations {
            self.num_iterations = Some(num_iterations);
        }
        if let Some(ref output_root) = other.output_root {
            self.output_root = Some(output_root.clone());
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
        if let Some(ref trainer) = other.trainer {
            self.trainer = Some(trainer.clone());
        }
    }

    pub fn settings(&self) -> SweepSettings {
        SweepSettings {
            seeds: self.seeds.clone().unwrap_or_else(|| vec![0]),
            num_iterations: self.num_iterations.unwrap_or(DEFAULT_NUM_ITERATIONS),
        }
    }

    pub fn output_root(&self) -> PathBuf {
        self.output_root.clone().unwrap_or_else(|| PathBuf::from("output"))
    }
}
