use crate::sweep::RunSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    SweepStarted { total: usize },
    Launching { run: RunSpec, seed: u64, output_folder: PathBuf },
    Finished { run: RunSpec, seed: u64 },
    SweepFinished { completed: usize },
}

pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: ProgressEvent);
}

/// Human-readable notices on stdout.
#[derive(Debug, Default)]
pub struct StdoutProgressSink;

impl ProgressSink for StdoutProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::SweepStarted { total } => println!("[sweep] {total} run(s) planned"),
            ProgressEvent::Launching { run, seed, .. } => println!(
                "Performing experiment with {} variables and {} edges, data size: {}, seed: {}",
                run.num_variables, run.num_edges, run.data_size, seed
            ),
            ProgressEvent::Finished { run, seed } => println!("[sweep] {run} seed {seed} finished"),
            ProgressEvent::SweepFinished { completed } => {
                println!("[sweep] {completed} run(s) completed");
            }
        }
    }
}
