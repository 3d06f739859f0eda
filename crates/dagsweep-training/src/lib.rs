//! Dagsweep Training
//!
//! Sweep-to-invocation translation for DAG structure-learning experiments:
//! - Enumerating runs from a (possibly jagged) sweep description (`SweepConfig`)
//! - Declaring and parsing the training entry point's options (`ArgumentContract`)
//! - Translating option maps into flag tokens (`OptionMap`)
//! - Building validated invocations with collision-free output folders (`InvocationBuilder`)
//! - Running a sweep sequentially against a training backend (`Trainer`)

pub mod command;
pub mod config;
pub mod contract;
pub mod driver;
pub mod error;
pub mod invocation;
pub mod layout;
pub mod options;
pub mod progress;
pub mod sweep;
pub mod trainer;

pub use command::{CommandTrainer, InvocationManifest};
pub use config::{DriverConfig, TrainerConfig};
pub use contract::{ArgumentContract, GraphSource, OptionSpec, Prior, TrainConfig, flags};
pub use driver::{SweepSettings, SweepSummary, plan_sweep, run_sweep};
pub use error::{ConfigError, ContractError, SweepError, TrainingError, TrainingResult};
pub use invocation::{Invocation, InvocationBuilder, prefill_for};
pub use layout::OutputLayout;
pub use options::{OptionMap, OptionValue};
pub use progress::{ProgressEvent, ProgressSink, StdoutProgressSink};
pub use sweep::{RunSpec, SweepConfig, SweepEntry};
pub use trainer::{DryRunTrainer, Trainer};
