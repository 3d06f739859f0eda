use thiserror::Error;

pub type TrainingResult<T> = std::result::Result<T, TrainingError>;
pub type SweepResult<T> = std::result::Result<T, SweepError>;
pub type ContractResult<T> = std::result::Result<T, ContractError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Failures in the shape of a sweep description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SweepError {
    #[error(
        "sweep entry for {num_variables} variables lists {edge_counts} edge counts but {sample_lists} data_size lists"
    )]
    ShapeMismatch { num_variables: u32, edge_counts: usize, sample_lists: usize },

    #[error("a sweep needs at least one seed")]
    NoSeeds,

    #[error("variable count key '{0}' is not a non-negative integer")]
    InvalidKey(String),

    #[error(
        "sweep entry for {num_variables} variables must be `num_edges = <int>` with `data_size = [..]`, or `num_edges = [..]` with `data_size = [[..], ..]`: {message}"
    )]
    InvalidEntry { num_variables: u32, message: String },

    #[error("failed to parse sweep file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Failures while matching tokens against the argument contract.
///
/// Every variant except `Help` and `Rejected` names the option at fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("unrecognized option '{flag}'")]
    UnknownFlag { flag: String },

    #[error("unrecognized graph type '{name}' (expected one of: {})", .available.join(", "))]
    UnknownSubcommand { name: String, available: Vec<String> },

    #[error("a graph type is required (one of: {})", .available.join(", "))]
    MissingSubcommand { available: Vec<String> },

    #[error("missing required option(s): {}", .options.join(", "))]
    MissingRequired { options: Vec<String> },

    #[error("invalid value '{value}' for '{option}': {reason}")]
    InvalidValue { option: String, value: String, reason: String },

    #[error("invalid value '{value}' for '{option}' (possible values: {})", .choices.join(", "))]
    InvalidChoice { option: String, value: String, choices: Vec<String> },

    #[error("{message}")]
    Rejected { message: String },

    /// Help or version output was requested instead of a configuration.
    #[error("{0}")]
    Help(String),
}

/// Failures while loading driver configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(String),

    #[error("failed to read configuration file: {0}")]
    ReadError(String),

    #[error("failed to parse configuration file: {0}")]
    ParseError(String),
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("trainer error: {0}")]
    Trainer(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
