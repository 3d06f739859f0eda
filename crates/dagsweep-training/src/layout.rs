use crate::error::TrainingResult;
use crate::sweep::RunSpec;
use std::path::{Path, PathBuf};

/// Filesystem layout for sweep outputs.
///
/// Each run lands in `<root>/<num_variables>_<num_edges>_<data_size>_<seed>`, so two
/// runs differing in any of the four values never share a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(PathBuf::from("output"))
    }
}

impl OutputLayout {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn run_dir(&self, run: &RunSpec, seed: u64) -> PathBuf {
        self.root.join(format!(
            "{}_{}_{}_{}",
            run.num_variables, run.num_edges, run.data_size, seed
        ))
    }

    /// Record of the invocation that produced a run folder.
    #[must_use]
    pub fn manifest_path(run_dir: &Path) -> PathBuf {
        run_dir.join("invocation.json")
    }

    pub fn ensure_run_dir(&self, run: &RunSpec, seed: u64) -> TrainingResult<PathBuf> {
        let dir = self.run_dir(run, seed);
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
