//! Input document types
//!
//! Both documents are written by the optimization loop and only ever read
//! here. Absent keys fall back to zero/empty values instead of failing the
//! parse, so a partially written document still produces a report.

use serde::{Deserialize, Serialize};

/// Pattern key used when an applied optimization does not name one
pub const UNKNOWN_PATTERN: &str = "unknown";

/// Progress counters of the optimization loop (`optimization_state.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationState {
    /// Completed iterations
    pub iteration: u64,

    /// Cumulative improvement in percent
    pub total_improvement: f64,

    /// Optimizations that were kept
    pub successful_optimizations: u64,

    /// Optimizations that were rolled back
    pub failed_attempts: u64,
}

impl OptimizationState {
    /// Fraction of attempts that succeeded; zero attempts count as 0.0
    pub fn success_rate(&self) -> f64 {
        let attempts = (self.successful_optimizations + self.failed_attempts).max(1);
        self.successful_optimizations as f64 / attempts as f64
    }
}

/// One entry of the per-iteration improvement history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementEntry {
    pub improvement: f64,
}

/// One applied optimization and the improvement it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppliedOptimization {
    pub pattern: String,
    pub improvement: f64,
}

impl Default for AppliedOptimization {
    fn default() -> Self {
        Self {
            pattern: UNKNOWN_PATTERN.to_string(),
            improvement: 0.0,
        }
    }
}

/// Metrics log of the optimization loop (`kaizen_metrics.json`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsLog {
    pub improvement_history: Vec<ImprovementEntry>,
    pub optimizations_applied: Vec<AppliedOptimization>,
}

impl MetricsLog {
    /// Improvement values in history order
    pub fn improvements(&self) -> Vec<f64> {
        self.improvement_history.iter().map(|h| h.improvement).collect()
    }
}
