//! Effectiveness analysis
//!
//! Pure statistics over the two input documents: least-squares trend,
//! exponential-decay convergence estimate, return on investment and
//! per-pattern effectiveness.

pub mod convergence;
pub mod patterns;
pub mod roi;
pub mod series;
pub mod trend;
pub mod types;

pub use convergence::{ConvergencePredictor, DEFAULT_CONVERGENCE_THRESHOLD};
pub use patterns::identify_patterns;
pub use roi::calculate_roi;
pub use series::{cumulative, efficiency_curve};
pub use trend::{analyze_trend, LinearFit};
pub use types::{PatternStat, RoiResult, TrendDirection, TrendResult};
