//! Analysis result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the improvement trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Degrading,
    Stable,
    /// Fewer than two data points
    InsufficientData,
    /// No improvement history at all
    NoData,
}

impl TrendDirection {
    /// Classify a fitted slope
    pub fn from_slope(slope: f64, threshold: f64) -> Self {
        if slope > threshold {
            TrendDirection::Improving
        } else if slope < -threshold {
            TrendDirection::Degrading
        } else {
            TrendDirection::Stable
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Degrading => "degrading",
            TrendDirection::Stable => "stable",
            TrendDirection::InsufficientData => "insufficient_data",
            TrendDirection::NoData => "no_data",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Least-squares trend over the improvement history
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// Improvement change per iteration
    pub slope: f64,

    /// Fraction of variance explained by the fit (0.0 to 1.0)
    pub r_squared: f64,

    pub trend: TrendDirection,
}

impl TrendResult {
    /// Result for fewer than two points
    pub fn insufficient_data() -> Self {
        Self {
            slope: 0.0,
            r_squared: 0.0,
            trend: TrendDirection::InsufficientData,
        }
    }

    /// Result for an empty history
    pub fn no_data() -> Self {
        Self {
            slope: 0.0,
            r_squared: 0.0,
            trend: TrendDirection::NoData,
        }
    }
}

/// Return on the time invested in the optimization loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    pub total_improvement: f64,
    pub improvement_per_hour: f64,
    pub improvement_per_iteration: f64,

    /// Actual vs expected improvement, capped at 100
    pub efficiency_score: f64,

    pub time_invested_hours: f64,
}

/// Effectiveness of one optimization pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternStat {
    pub pattern: String,
    pub count: usize,
    pub avg_improvement: f64,

    /// Population standard deviation of the improvements
    pub std_improvement: f64,

    /// Sum of all improvements
    pub total_impact: f64,

    /// `1 - std / max(avg, 0.001)`; unbounded when the average is near zero
    pub reliability: f64,
}
