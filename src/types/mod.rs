//! Type definitions module
//!
//! Input documents read from disk on every report cycle.

pub mod inputs;

// Re-export commonly used types
pub use inputs::{AppliedOptimization, ImprovementEntry, MetricsLog, OptimizationState};
