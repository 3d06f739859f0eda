//! Sweep enumeration.
//!
//! A sweep file maps a variable count to either one shared edge count with a
//! list of data sizes, or a list of edge counts each paired positionally with
//! its own list of data sizes:
//!
//! ```toml
//! [variables.10]
//! num_edges = 5
//! data_size = [100, 500]
//!
//! [variables.20]
//! num_edges = [2, 4]
//! data_size = [[50], [50, 200]]
//! ```

use crate::error::{SweepError, SweepResult};
use crate::options::OptionValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// One concrete combination of sweep parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunSpec {
    pub num_variables: u32,
    pub num_edges: u32,
    pub data_size: u32,
}

impl RunSpec {
    #[must_use]
    pub fn new(num_variables: u32, num_edges: u32, data_size: u32) -> Self {
        Self { num_variables, num_edges, data_size }
    }
}

impl fmt::Display for RunSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.num_variables, self.num_edges, self.data_size)
    }
}

/// Edge counts and data sizes swept for a single variable count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SweepEntry {
    Uniform { num_edges: u32, data_size: Vec<u32> },
    Jagged { num_edges: Vec<u32>, data_size: Vec<Vec<u32>> },
}

impl SweepEntry {
    /// Number of runs this entry expands to, or the shape error it carries.
    pub fn len(&self, num_variables: u32) -> SweepResult<usize> {
        self.check(num_variables)?;
        Ok(match self {
            Self::Uniform { data_size, .. } => data_size.len(),
            Self::Jagged { data_size, .. } => data_size.iter().map(Vec::len).sum(),
        })
    }

    fn check(&self, num_variables: u32) -> SweepResult<()> {
        match self {
            Self::Uniform { .. } => Ok(()),
            Self::Jagged { num_edges, data_size } if num_edges.len() == data_size.len() => Ok(()),
            Self::Jagged { num_edges, data_size } => Err(SweepError::ShapeMismatch {
                num_variables,
                edge_counts: num_edges.len(),
                sample_lists: data_size.len(),
            }),
        }
    }

    /// (edge count, data sizes) groups in declaration order.
    fn groups(&self) -> Vec<(u32, &[u32])> {
        match self {
            Self::Uniform { num_edges, data_size } => vec![(*num_edges, data_size.as_slice())],
            Self::Jagged { num_edges, data_size } => num_edges
                .iter()
                .copied()
                .zip(data_size.iter().map(Vec::as_slice))
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SweepFile {
    #[serde(default)]
    options: BTreeMap<String, OptionValue>,
    // Decoded per key in `from_file` so shape errors can name the key.
    #[serde(default)]
    variables: BTreeMap<String, serde_json::Value>,
}

/// A full sweep description.
///
/// Entries are keyed by variable count and enumerated in ascending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepConfig {
    entries: BTreeMap<u32, SweepEntry>,
    options: BTreeMap<String, OptionValue>,
}

impl SweepConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, num_variables: u32, entry: SweepEntry) -> Self {
        self.entries.insert(num_variables, entry);
        self
    }

    #[must_use]
    pub fn with_option(mut self, flag: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(flag.into(), value.into());
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = (u32, &SweepEntry)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    /// Options applied to every invocation of the sweep, keyed by flag token.
    pub fn base_options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    pub fn from_toml_str(content: &str) -> SweepResult<Self> {
        let file: SweepFile = toml::from_str(content)
            .map_err(|e| SweepError::Parse { path: "<toml>".to_string(), message: e.to_string() })?;
        Self::from_file(file)
    }

    pub fn from_json_str(content: &str) -> SweepResult<Self> {
        let file: SweepFile = serde_json::from_str(content)
            .map_err(|e| SweepError::Parse { path: "<json>".to_string(), message: e.to_string() })?;
        Self::from_file(file)
    }

    /// Load a sweep file; `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> SweepResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SweepError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json { Self::from_json_str(&content) } else { Self::from_toml_str(&content) };
        parsed.map_err(|e| match e {
            SweepError::Parse { message, .. } => {
                SweepError::Parse { path: path.display().to_string(), message }
            }
            other => other,
        })
    }

    fn from_file(file: SweepFile) -> SweepResult<Self> {
        let mut entries = BTreeMap::new();
        for (key, entry) in file.variables {
            let num_variables =
                key.trim().parse::<u32>().map_err(|_| SweepError::InvalidKey(key.clone()))?;
            let entry = serde_json::from_value::<SweepEntry>(entry)
                .map_err(|e| SweepError::InvalidEntry { num_variables, message: e.to_string() })?;
            entries.insert(num_variables, entry);
        }
        Ok(Self { entries, options: file.options })
    }

    /// Check every entry's shape without enumerating.
    pub fn validate(&self) -> SweepResult<()> {
        self.entries.iter().try_for_each(|(nv, entry)| entry.check(*nv))
    }

    /// Total number of runs the sweep expands to.
    pub fn len(&self) -> SweepResult<usize> {
        self.entries.iter().map(|(nv, entry)| entry.len(*nv)).sum()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.len(), Ok(0))
    }

    /// Lazily enumerate every run. Each call starts a fresh pass.
    pub fn runs(&self) -> SweepRuns<'_> {
        SweepRuns { entries: self.entries.iter(), cursor: None, done: false }
    }
}

/// Iterator returned by [`SweepConfig::runs`].
///
/// A shape mismatch is yielded once as an error, then the iterator ends.
pub struct SweepRuns<'a> {
    entries: std::collections::btree_map::Iter<'a, u32, SweepEntry>,
    cursor: Option<EntryCursor<'a>>,
    done: bool,
}

struct EntryCursor<'a> {
    num_variables: u32,
    groups: Vec<(u32, &'a [u32])>,
    group: usize,
    sample: usize,
}

impl EntryCursor<'_> {
    fn next_run(&mut self) -> Option<RunSpec> {
        while let Some((num_edges, sizes)) = self.groups.get(self.group) {
            if let Some(size) = sizes.get(self.sample) {
                self.sample += 1;
                return Some(RunSpec::new(self.num_variables, *num_edges, *size));
            }
            self.group += 1;
            self.sample = 0;
        }
        None
    }
}

impl Iterator for SweepRuns<'_> {
    type Item = SweepResult<RunSpec>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if let Some(run) = self.cursor.as_mut().and_then(EntryCursor::next_run) {
                return Some(Ok(run));
            }
            let Some((num_variables, entry)) = self.entries.next() else {
                self.done = true;
                return None;
            };
            if let Err(e) = entry.check(*num_variables) {
                self.done = true;
                return Some(Err(e));
            }
            self.cursor = Some(EntryCursor {
                num_variables: *num_variables,
                groups: entry.groups(),
                group: 0,
                sample: 0,
            });
        }
    }
}

impl std::iter::FusedIterator for SweepRuns<'_> {}
