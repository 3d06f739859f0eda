//! CLI configuration loading.

use anyhow::{Context, Result};
use dagsweep_training::DriverConfig;
use std::path::Path;

/// Load driver configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (handled by clap)
/// 2. Explicit `--config` file, if given
/// 3. Local config file (./dagsweep.toml)
/// 4. Global config file (~/.dagsweep/config.toml)
/// 5. Defaults
pub fn load_config(explicit: Option<&Path>) -> Result<DriverConfig> {
    match explicit {
        Some(path) => DriverConfig::load_from_file(path)
            .with_context(|| format!("Failed to load driver config {}", path.display())),
        None => DriverConfig::discover_and_load().context("Failed to load driver config"),
    }
}
