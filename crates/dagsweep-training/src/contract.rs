//! The argument contract of the training entry point.
//!
//! `TrainConfig` declares every recognized option with its type and default.
//! [`ArgumentContract`] wraps the built command once and parses either real
//! command-line tokens or an [`OptionMap`]; both paths run the same matcher and
//! produce the same `TrainConfig`.

use crate::error::{ContractError, ContractResult};
use crate::options::OptionMap;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Flag tokens as they appear on the command line.
pub mod flags {
    pub const NUM_ENVS: &str = "--num_envs";
    pub const SCORER_KWARGS: &str = "--scorer_kwargs";
    pub const PRIOR: &str = "--prior";
    pub const PRIOR_KWARGS: &str = "--prior_kwargs";
    pub const LR: &str = "--lr";
    pub const DELTA: &str = "--delta";
    pub const BATCH_SIZE: &str = "--batch_size";
    pub const NUM_ITERATIONS: &str = "--num_iterations";
    pub const REPLAY_CAPACITY: &str = "--replay_capacity";
    pub const PREFILL: &str = "--prefill";
    pub const MIN_EXPLORATION: &str = "--min_exploration";
    pub const UPDATE_EPSILON_EVERY: &str = "--update_epsilon_every";
    pub const NUM_SAMPLES_POSTERIOR: &str = "--num_samples_posterior";
    pub const UPDATE_TARGET_EVERY: &str = "--update_target_every";
    pub const SEED: &str = "--seed";
    pub const NUM_WORKERS: &str = "--num_workers";
    pub const MP_CONTEXT: &str = "--mp_context";
    pub const OUTPUT_FOLDER: &str = "--output_folder";

    pub const ERDOS_RENYI_LINGAUSS: &str = "erdos_renyi_lingauss";
    pub const SACHS_CONTINUOUS: &str = "sachs_continuous";
    pub const SACHS_INTERVENTIONAL: &str = "sachs_interventional";

    pub const NUM_VARIABLES: &str = "--num_variables";
    pub const NUM_EDGES: &str = "--num_edges";
    pub const NUM_SAMPLES: &str = "--num_samples";
}

/// Prior over graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prior {
    #[value(name = "uniform")]
    Uniform,
    #[value(name = "erdos_renyi")]
    ErdosRenyi,
    #[value(name = "edge")]
    Edge,
    #[value(name = "fair")]
    Fair,
}

impl Prior {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::ErdosRenyi => "erdos_renyi",
            Self::Edge => "edge",
            Self::Fair => "fair",
        }
    }
}

impl fmt::Display for Prior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the graph and data; exactly one must be selected.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand, Serialize, Deserialize)]
#[serde(tag = "graph", rename_all = "snake_case")]
pub enum GraphSource {
    /// Erdos-Renyi graphs with linear-Gaussian data
    #[command(name = "erdos_renyi_lingauss")]
    ErdosRenyiLingauss {
        /// Number of variables
        #[arg(long = "num_variables")]
        num_variables: u32,

        /// Average number of edges
        #[arg(long = "num_edges")]
        num_edges: u32,

        /// Number of samples
        #[arg(long = "num_samples")]
        num_samples: u32,
    },

    /// Flow cytometry data (Sachs) with observational data
    #[command(name = "sachs_continuous")]
    SachsContinuous,

    /// Flow cytometry data (Sachs) with interventional data
    #[command(name = "sachs_interventional")]
    SachsInterventional,
}

impl GraphSource {
    /// Subcommand token selecting this source.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ErdosRenyiLingauss { .. } => flags::ERDOS_RENYI_LINGAUSS,
            Self::SachsContinuous => flags::SACHS_CONTINUOUS,
            Self::SachsInterventional => flags::SACHS_INTERVENTIONAL,
        }
    }
}

fn parse_json_object(raw: &str) -> Result<JsonObject, String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!("expected a JSON object, got {other}")),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

/// Fully parsed configuration handed to the training entry point.
#[derive(Debug, Clone, PartialEq, Parser, Serialize, Deserialize)]
#[command(
    name = "train",
    about = "DAG-GFlowNet for Structure Learning.",
    subcommand_required = true,
    disable_help_subcommand = true,
    subcommand_value_name = "GRAPH",
    subcommand_help_heading = "Type of graph"
)]
pub struct TrainConfig {
    /// Number of parallel environments
    #[arg(long = "num_envs", default_value_t = 8, help_heading = "Environment")]
    pub num_envs: u32,

    /// Arguments of the scorer
    #[arg(long = "scorer_kwargs", default_value = "{}", value_parser = parse_json_object, help_heading = "Environment")]
    pub scorer_kwargs: JsonObject,

    /// Prior over graphs
    #[arg(long = "prior", value_enum, default_value_t = Prior::Uniform, help_heading = "Environment")]
    pub prior: Prior,

    /// Arguments of the prior over graphs
    #[arg(long = "prior_kwargs", default_value = "{}", value_parser = parse_json_object, help_heading = "Environment")]
    pub prior_kwargs: JsonObject,

    /// Learning rate
    #[arg(long = "lr", allow_negative_numbers = true, default_value_t = 1e-5, help_heading = "Optimization")]
    pub lr: f64,

    /// Value of delta for Huber loss
    #[arg(long = "delta", allow_negative_numbers = true, default_value_t = 1.0, help_heading = "Optimization")]
    pub delta: f64,

    /// Batch size
    #[arg(long = "batch_size", default_value_t = 32, help_heading = "Optimization")]
    pub batch_size: u32,

    /// Number of iterations
    #[arg(long = "num_iterations", default_value_t = 100_000, help_heading = "Optimization")]
    pub num_iterations: u64,

    /// Capacity of the replay buffer
    #[arg(long = "replay_capacity", default_value_t = 100_000, help_heading = "Replay Buffer")]
    pub replay_capacity: u64,

    /// Number of iterations with a random policy to prefill the replay buffer
    #[arg(long = "prefill", default_value_t = 1000, help_heading = "Replay Buffer")]
    pub prefill: u64,

    /// Minimum value of epsilon-exploration
    #[arg(long = "min_exploration", allow_negative_numbers = true, default_value_t = 0.1, help_heading = "Exploration")]
    pub min_exploration: f64,

    /// Frequency of update for epsilon
    #[arg(long = "update_epsilon_every", default_value_t = 10, help_heading = "Exploration")]
    pub update_epsilon_every: u32,

    /// Number of samples for the posterior estimate
    #[arg(long = "num_samples_posterior", default_value_t = 1000, help_heading = "Miscellaneous")]
    pub num_samples_posterior: u32,

    /// Frequency of update for the target network
    #[arg(long = "update_target_every", default_value_t = 1000, help_heading = "Miscellaneous")]
    pub update_target_every: u32,

    /// Random seed
    #[arg(long = "seed", default_value_t = 0, help_heading = "Miscellaneous")]
    pub seed: u64,

    /// Number of workers
    #[arg(long = "num_workers", default_value_t = 4, help_heading = "Miscellaneous")]
    pub num_workers: u32,

    /// Multiprocessing context
    #[arg(long = "mp_context", default_value = "spawn", help_heading = "Miscellaneous")]
    pub mp_context: String,

    /// Output folder
    #[arg(long = "output_folder", default_value = "output", help_heading = "Miscellaneous")]
    pub output_folder: PathBuf,

    #[command(subcommand)]
    pub graph: GraphSource,
}

impl TrainConfig {
    /// Canonical option map: every top-level option, then the graph selector and its fields.
    pub fn to_option_map(&self) -> OptionMap {
        let mut map = OptionMap::new()
            .with(flags::NUM_ENVS, self.num_envs)
            .with(flags::SCORER_KWARGS, self.scorer_kwargs.clone())
            .with(flags::PRIOR, self.prior.as_str())
            .with(flags::PRIOR_KWARGS, self.prior_kwargs.clone())
            .with(flags::LR, self.lr)
            .with(flags::DELTA, self.delta)
            .with(flags::BATCH_SIZE, self.batch_size)
            .with(flags::NUM_ITERATIONS, self.num_iterations)
            .with(flags::REPLAY_CAPACITY, self.replay_capacity)
            .with(flags::PREFILL, self.prefill)
            .with(flags::MIN_EXPLORATION, self.min_exploration)
            .with(flags::UPDATE_EPSILON_EVERY, self.update_epsilon_every)
            .with(flags::NUM_SAMPLES_POSTERIOR, self.num_samples_posterior)
            .with(flags::UPDATE_TARGET_EVERY, self.update_target_every)
            .with(flags::SEED, self.seed)
            .with(flags::NUM_WORKERS, self.num_workers)
            .with(flags::MP_CONTEXT, self.mp_context.as_str())
            .with(flags::OUTPUT_FOLDER, self.output_folder.clone())
            .with(self.graph.name(), true);

        if let GraphSource::ErdosRenyiLingauss { num_variables, num_edges, num_samples } = &self.graph {
            map.insert(flags::NUM_VARIABLES, *num_variables)
                .insert(flags::NUM_EDGES, *num_edges)
                .insert(flags::NUM_SAMPLES, *num_samples);
        }
        map
    }

    pub fn to_tokens(&self) -> Vec<String> {
        self.to_option_map().to_tokens()
    }
}

/// One declared option, as listed by [`ArgumentContract::describe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    pub flag: String,
    pub group: Option<String>,
    /// Owning graph subcommand, `None` for top-level options.
    pub subcommand: Option<String>,
    pub default: Option<String>,
    pub choices: Vec<String>,
    pub required: bool,
    pub help: Option<String>,
}

/// Immutable schema of the training entry point's options.
#[derive(Debug, Clone)]
pub struct ArgumentContract {
    command: clap::Command,
}

impl Default for ArgumentContract {
    fn default() -> Self {
        Self::new()
    }
}

impl ArgumentContract {
    #[must_use]
    pub fn new() -> Self {
        Self { command: TrainConfig::command().no_binary_name(true) }
    }

    /// Parse tokens, excluding the program name.
    pub fn parse_tokens<I, T>(&self, tokens: I) -> ContractResult<TrainConfig>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.clone().try_get_matches_from(tokens).map_err(ContractError::from)?;
        TrainConfig::from_arg_matches(&matches).map_err(ContractError::from)
    }

    /// Parse a programmatic option map through the same path as command-line tokens.
    pub fn parse_options(&self, options: &OptionMap) -> ContractResult<TrainConfig> {
        self.parse_tokens(options.to_tokens())
    }

    /// Parse the arguments of the current process.
    pub fn parse_env(&self) -> ContractResult<TrainConfig> {
        self.parse_tokens(std::env::args_os().skip(1))
    }

    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.command
            .get_subcommands()
            .map(|s| s.get_name().to_string())
            .filter(|name| name != "help")
            .collect()
    }

    /// Every declared option, top-level first, then per graph subcommand.
    pub fn describe(&self) -> Vec<OptionSpec> {
        let mut specs: Vec<OptionSpec> = declared_args(&self.command, None).collect();
        for sub in self.command.get_subcommands().filter(|s| s.get_name() != "help") {
            specs.extend(declared_args(sub, Some(sub.get_name())));
        }
        specs
    }
}

fn declared_args<'a>(
    command: &'a clap::Command,
    subcommand: Option<&'a str>,
) -> impl Iterator<Item = OptionSpec> + 'a {
    command
        .get_arguments()
        .filter(|arg| !matches!(arg.get_id().as_str(), "help" | "version"))
        .filter_map(move |arg| {
            let long = arg.get_long()?;
            Some(OptionSpec {
                flag: format!("--{long}"),
                group: arg.get_help_heading().map(str::to_string),
                subcommand: subcommand.map(str::to_string),
                default: arg
                    .get_default_values()
                    .first()
                    .map(|v| v.to_string_lossy().into_owned()),
                choices: arg
                    .get_possible_values()
                    .iter()
                    .map(|v| v.get_name().to_string())
                    .collect(),
                required: arg.is_required_set(),
                help: arg.get_help().map(ToString::to_string),
            })
        })
}

fn context_string(err: &clap::Error, kind: ContextKind) -> Option<String> {
    match err.get(kind)? {
        ContextValue::String(s) => Some(s.clone()),
        ContextValue::Strings(v) => v.first().cloned(),
        _ => None,
    }
}

fn context_strings(err: &clap::Error, kind: ContextKind) -> Vec<String> {
    match err.get(kind) {
        Some(ContextValue::Strings(v)) => v.clone(),
        Some(ContextValue::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// `--num_variables <NUM_VARIABLES>` and `--seed=3` both reduce to the bare flag.
fn flag_of(rendered: &str) -> String {
    let head = rendered.split_whitespace().next().unwrap_or(rendered);
    head.split('=').next().unwrap_or(head).to_string()
}

fn available_graphs() -> Vec<String> {
    vec![
        flags::ERDOS_RENYI_LINGAUSS.to_string(),
        flags::SACHS_CONTINUOUS.to_string(),
        flags::SACHS_INTERVENTIONAL.to_string(),
    ]
}

impl From<clap::Error> for ContractError {
    fn from(err: clap::Error) -> Self {
        let option = context_string(&err, ContextKind::InvalidArg).map(|a| flag_of(&a));
        let value = context_string(&err, ContextKind::InvalidValue).unwrap_or_default();

        match err.kind() {
            ErrorKind::UnknownArgument | ErrorKind::InvalidSubcommand => {
                match context_string(&err, ContextKind::InvalidSubcommand) {
                    Some(name) => Self::UnknownSubcommand { name, available: available_graphs() },
                    None => {
                        let flag = option.unwrap_or_default();
                        if flag.starts_with('-') {
                            Self::UnknownFlag { flag }
                        } else {
                            Self::UnknownSubcommand { name: flag, available: available_graphs() }
                        }
                    }
                }
            }
            ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Self::MissingSubcommand { available: available_graphs() }
            }
            ErrorKind::MissingRequiredArgument => Self::MissingRequired {
                options: context_strings(&err, ContextKind::InvalidArg)
                    .iter()
                    .map(|a| flag_of(a))
                    .collect(),
            },
            ErrorKind::InvalidValue => {
                let choices = context_strings(&err, ContextKind::ValidValue);
                // Also raised when the option is last and has no value.
                if choices.is_empty() || value.is_empty() {
                    Self::InvalidValue {
                        option: option.unwrap_or_default(),
                        value,
                        reason: "a value is required".to_string(),
                    }
                } else {
                    Self::InvalidChoice { option: option.unwrap_or_default(), value, choices }
                }
            }
            ErrorKind::ValueValidation => Self::InvalidValue {
                option: option.unwrap_or_default(),
                value,
                reason: std::error::Error::source(&err)
                    .map_or_else(|| "invalid value".to_string(), ToString::to_string),
            },
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Self::Help(err.render().to_string()),
            _ => Self::Rejected { message: err.render().to_string().trim().to_string() },
        }
    }
}
