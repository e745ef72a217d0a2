//! Least-squares trend analysis over iteration indices

use crate::analysis::types::{TrendDirection, TrendResult};

/// Slope beyond which the trend counts as improving or degrading
pub const TREND_SLOPE_THRESHOLD: f64 = 0.1;

/// First-degree least-squares fit `y = slope * x + intercept`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Fit `values` against x = 0..n-1
    ///
    /// Returns `None` for fewer than two points or when any coefficient is
    /// not finite.
    pub fn over_indices(values: &[f64]) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }

        let n_f = n as f64;
        let mean_x = (n_f - 1.0) / 2.0;
        let mean_y = values.iter().sum::<f64>() / n_f;

        let mut sxy = 0.0;
        let mut sxx = 0.0;
        for (i, y) in values.iter().enumerate() {
            let dx = i as f64 - mean_x;
            sxy += dx * (y - mean_y);
            sxx += dx * dx;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        if slope.is_finite() && intercept.is_finite() {
            Some(Self { slope, intercept })
        } else {
            None
        }
    }

    /// Evaluate the line at `x`
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Coefficient of determination of this fit over `values`
    ///
    /// Zero when the values have no variance.
    pub fn r_squared(&self, values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (i, y) in values.iter().enumerate() {
            let residual = y - self.at(i as f64);
            ss_res += residual * residual;
            ss_tot += (y - mean) * (y - mean);
        }

        if ss_tot > 0.0 {
            (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Analyze the trend of an improvement sequence
pub fn analyze_trend(values: &[f64]) -> TrendResult {
    let fit = match LinearFit::over_indices(values) {
        Some(fit) => fit,
        None => return TrendResult::insufficient_data(),
    };

    TrendResult {
        slope: fit.slope,
        r_squared: fit.r_squared(values),
        trend: TrendDirection::from_slope(fit.slope, TREND_SLOPE_THRESHOLD),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_insufficient_data() {
        assert_eq!(analyze_trend(&[]), TrendResult::insufficient_data());
        assert_eq!(analyze_trend(&[4.2]), TrendResult::insufficient_data());
    }

    #[test]
    fn test_linear_increasing() {
        let result = analyze_trend(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((result.slope - 1.0).abs() < 1e-12);
        assert!((result.r_squared - 1.0).abs() < 1e-12);
        assert_eq!(result.trend, TrendDirection::Improving);
    }

    #[test]
    fn test_constant_sequence_is_stable_with_zero_r_squared() {
        let result = analyze_trend(&[3.0, 3.0, 3.0, 3.0]);
        assert_eq!(result.slope, 0.0);
        assert_eq!(result.r_squared, 0.0);
        assert_eq!(result.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_degrading() {
        let result = analyze_trend(&[10.0, 8.0, 5.0, 3.0]);
        assert!(result.slope < -0.1);
        assert_eq!(result.trend, TrendDirection::Degrading);
    }

    #[test]
    fn test_small_slope_is_stable() {
        let result = analyze_trend(&[5.0, 5.05, 5.1, 5.15]);
        assert!((result.slope - 0.05).abs() < 1e-9);
        assert_eq!(result.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_fit_coefficients() {
        let fit = LinearFit::over_indices(&[1.0, 3.0, 5.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.at(3.0) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_fit_is_none() {
        assert!(LinearFit::over_indices(&[1.0, f64::NAN, 2.0]).is_none());
    }

    #[quickcheck]
    fn prop_short_sequences_have_no_trend(values: Vec<f64>) -> bool {
        let short: Vec<f64> = values.into_iter().take(1).collect();
        analyze_trend(&short) == TrendResult::insufficient_data()
    }

    #[quickcheck]
    fn prop_r_squared_in_unit_interval(values: Vec<i16>) -> bool {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let r2 = analyze_trend(&values).r_squared;
        (0.0..=1.0).contains(&r2)
    }
}
