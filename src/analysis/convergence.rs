//! Convergence prediction
//!
//! Fits an exponential decay to the improvement history by regressing
//! `ln(v - min + eps)` on the iteration index, then solves for the index at
//! which the model drops below the threshold.

use crate::analysis::trend::LinearFit;

/// Improvement (percent) below which the loop counts as converged
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.05;

/// Minimum history length for a prediction
pub const MIN_POINTS: usize = 3;

/// Offset keeping the log transform finite at the minimum value
const LOG_EPSILON: f64 = 0.001;

/// Predicts remaining iterations until improvements fall below a threshold
#[derive(Debug, Clone)]
pub struct ConvergencePredictor {
    threshold: f64,
}

impl ConvergencePredictor {
    /// Create predictor with the default threshold
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_CONVERGENCE_THRESHOLD)
    }

    /// Create predictor with a custom threshold
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Get threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Predict iterations remaining after the current history
    ///
    /// `None` when there are fewer than three points, the fit is not
    /// decaying, or any intermediate value is not finite.
    pub fn predict(&self, improvements: &[f64]) -> Option<usize> {
        if improvements.len() < MIN_POINTS {
            return None;
        }

        let min = improvements.iter().copied().fold(f64::INFINITY, f64::min);
        let log_values: Vec<f64> = improvements
            .iter()
            .map(|v| (v - min + LOG_EPSILON).ln())
            .collect();

        if log_values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let fit = LinearFit::over_indices(&log_values)?;
        if fit.slope >= 0.0 {
            return None;
        }

        let crossing = (self.threshold.ln() - fit.intercept) / fit.slope;
        if !crossing.is_finite() {
            return None;
        }

        // Truncates toward zero; saturates on overflow
        let predicted_index = crossing as i64;
        let remaining = predicted_index.saturating_sub(improvements.len() as i64);

        Some(remaining.max(0) as usize)
    }
}

impl Default for ConvergencePredictor {
    fn default() -> Self {
        Self::new()
    }
}
