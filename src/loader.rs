//! Input loading
//!
//! Both documents are re-read in full on every call. A missing file is
//! replaced by an empty document; a file that fails to parse is handled
//! according to the configured [`MalformedPolicy`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{AnalyzerError, Result};
use crate::types::{MetricsLog, OptimizationState};

/// Default optimization state file name
pub const DEFAULT_STATE_FILE: &str = "optimization_state.json";

/// Default metrics log file name
pub const DEFAULT_METRICS_FILE: &str = "kaizen_metrics.json";

/// What to do with an input file that exists but does not parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Fail the cycle with [`AnalyzerError::MalformedInput`]
    Fail,
    /// Log a warning and continue with an empty document
    #[serde(rename = "defaults")]
    UseDefaults,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        MalformedPolicy::Fail
    }
}

/// Locations of the two input documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPaths {
    pub state_file: PathBuf,
    pub metrics_file: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            metrics_file: PathBuf::from(DEFAULT_METRICS_FILE),
        }
    }
}

/// Reads the optimization state and metrics log from disk
#[derive(Debug, Clone)]
pub struct InputLoader {
    paths: InputPaths,
    policy: MalformedPolicy,
}

impl InputLoader {
    /// Create loader
    pub fn new(paths: InputPaths, policy: MalformedPolicy) -> Self {
        Self { paths, policy }
    }

    /// Load the optimization state, zeroed when absent
    pub fn load_state(&self) -> Result<OptimizationState> {
        self.load(&self.paths.state_file)
    }

    /// Load the metrics log, empty when absent
    pub fn load_metrics(&self) -> Result<MetricsLog> {
        self.load(&self.paths.metrics_file)
    }

    /// Get input paths
    pub fn paths(&self) -> &InputPaths {
        &self.paths
    }

    /// Get malformed-input policy
    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    fn load<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "input file not found, using defaults");
                return Ok(T::default());
            }
            Err(e) => return Err(AnalyzerError::IoError(e)),
        };

        match serde_json::from_str(&contents) {
            Ok(doc) => Ok(doc),
            Err(e) => match self.policy {
                MalformedPolicy::Fail => Err(AnalyzerError::MalformedInput {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }),
                MalformedPolicy::UseDefaults => {
                    tracing::warn!(path = %path.display(), error = %e, "malformed input, using defaults");
                    Ok(T::default())
                }
            },
        }
    }
}
