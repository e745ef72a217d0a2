//! Return-on-investment calculation

use crate::analysis::types::RoiResult;
use crate::types::OptimizationState;

/// Assumed wall-clock cost of one iteration
pub const MINUTES_PER_ITERATION: f64 = 5.0;

/// Baseline improvement (percent) expected from each iteration
pub const EXPECTED_IMPROVEMENT_PER_ITERATION: f64 = 5.0;

/// Hours floor used when dividing by time invested
const MIN_HOURS: f64 = 0.1;

/// Efficiency score cap
pub const MAX_EFFICIENCY: f64 = 100.0;

/// Calculate ROI from the optimization state
pub fn calculate_roi(state: &OptimizationState) -> RoiResult {
    let iteration = state.iteration as f64;
    let total = state.total_improvement;

    let time_invested_hours = iteration * MINUTES_PER_ITERATION / 60.0;
    let expected = iteration * EXPECTED_IMPROVEMENT_PER_ITERATION;

    RoiResult {
        total_improvement: total,
        improvement_per_hour: total / time_invested_hours.max(MIN_HOURS),
        improvement_per_iteration: total / iteration.max(1.0),
        efficiency_score: efficiency(total, expected),
        time_invested_hours,
    }
}

/// Actual vs expected improvement as a score capped at 100
pub(crate) fn efficiency(actual: f64, expected: f64) -> f64 {
    (actual / expected.max(1.0) * 100.0).min(MAX_EFFICIENCY)
}
