//! Per-iteration series derived from the improvement history

use crate::analysis::roi::{efficiency, EXPECTED_IMPROVEMENT_PER_ITERATION};

/// Running sum of improvements
pub fn cumulative(improvements: &[f64]) -> Vec<f64> {
    improvements
        .iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Efficiency score after each iteration, capped at 100
///
/// Entry `i` compares the first `i + 1` improvements against the baseline
/// expectation for `i + 1` iterations.
pub fn efficiency_curve(improvements: &[f64]) -> Vec<f64> {
    cumulative(improvements)
        .into_iter()
        .enumerate()
        .map(|(i, actual)| {
            let expected = (i + 1) as f64 * EXPECTED_IMPROVEMENT_PER_ITERATION;
            efficiency(actual, expected)
        })
        .collect()
}
