//! Kaizen Effectiveness Analyzer
//!
//! Reads the state and metrics files of an iterative optimization loop and
//! reports how well it is doing: least-squares improvement trend,
//! exponential-decay convergence estimate, return on invested time and
//! per-pattern effectiveness, plus a four-panel chart.
//!
//! # Architecture
//!
//! - **loader**: re-reads both JSON documents every cycle
//! - **analysis**: pure statistics over the documents
//! - **advisor**: rule-based recommendations
//! - **report** / **chart**: text and PNG output
//! - **monitor**: report and chart timers, shutdown handling

pub mod errors;
pub mod types;
pub mod clock;
pub mod loader;
pub mod analysis;
pub mod advisor;
pub mod analyzer;
pub mod report;
pub mod chart;

// Re-export commonly used types
pub use errors::{AnalyzerError, Result};
pub use analyzer::{AnalyzerConfig, EffectivenessAnalyzer, Snapshot};

// Terminal surface
pub mod cli;
pub mod display;
pub mod logging;
pub mod monitor;
pub mod telemetry;
