//! Recommendation advisor
//!
//! Turns the computed statistics into a short list of actionable hints.
//! Rules run in a fixed order and each contributes at most one line.

use crate::analysis::{PatternStat, RoiResult, TrendDirection, TrendResult};
use crate::clock::{Clock, SystemClock};
use crate::types::OptimizationState;
use chrono::Timelike;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

/// Efficiency score below which failures should be reviewed
pub const LOW_EFFICIENCY_THRESHOLD: f64 = 50.0;

/// Success rate below which targets should be more conservative
pub const LOW_SUCCESS_RATE_THRESHOLD: f64 = 0.5;

/// Local hours (inclusive) for the merge-review reminder
pub const REVIEW_HOURS: RangeInclusive<u32> = 6..=8;

/// A single actionable recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Improvements are shrinking
    StopSoon,

    /// Improvements have plateaued
    AdjustParameters,

    /// Actual improvement lags the baseline
    ReviewFailures { efficiency_score: f64 },

    /// Best pattern by total impact
    TopPattern { pattern: String, avg_improvement: f64 },

    /// Most attempts are being rolled back
    ConservativeTargets { success_rate: f64 },

    /// Morning reminder to merge the night's results
    MergeReview,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::StopSoon => write!(
                f,
                "⚠️  Diminishing returns detected. Consider stopping after the next iteration."
            ),
            Recommendation::AdjustParameters => write!(
                f,
                "📊 Improvements plateauing. Try adjusting optimization parameters."
            ),
            Recommendation::ReviewFailures { .. } => write!(
                f,
                "🔧 Low efficiency detected. Review failed optimization attempts."
            ),
            Recommendation::TopPattern {
                pattern,
                avg_improvement,
            } => write!(
                f,
                "✨ Most effective pattern: {} (avg {:.1}% improvement)",
                pattern, avg_improvement
            ),
            Recommendation::ConservativeTargets { .. } => write!(
                f,
                "🎯 Success rate below 50%. Consider more conservative optimization targets."
            ),
            Recommendation::MergeReview => write!(
                f,
                "☀️  Morning hours - good time to review results and merge changes."
            ),
        }
    }
}

/// Rule-based recommendation generator
#[derive(Clone)]
pub struct Advisor {
    clock: Arc<dyn Clock>,
}

impl Advisor {
    /// Create advisor reading the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create advisor with a custom clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Generate recommendations
    ///
    /// `patterns` must already be ordered by total impact.
    pub fn recommend(
        &self,
        state: &OptimizationState,
        trend: &TrendResult,
        roi: &RoiResult,
        patterns: &[PatternStat],
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        match trend.trend {
            TrendDirection::Degrading => recommendations.push(Recommendation::StopSoon),
            TrendDirection::Stable => recommendations.push(Recommendation::AdjustParameters),
            _ => {}
        }

        if roi.efficiency_score < LOW_EFFICIENCY_THRESHOLD {
            recommendations.push(Recommendation::ReviewFailures {
                efficiency_score: roi.efficiency_score,
            });
        }

        if let Some(best) = patterns.first() {
            recommendations.push(Recommendation::TopPattern {
                pattern: best.pattern.clone(),
                avg_improvement: best.avg_improvement,
            });
        }

        let success_rate = state.success_rate();
        if success_rate < LOW_SUCCESS_RATE_THRESHOLD {
            recommendations.push(Recommendation::ConservativeTargets { success_rate });
        }

        if REVIEW_HOURS.contains(&self.clock.now().hour()) {
            recommendations.push(Recommendation::MergeReview);
        }

        recommendations
    }
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::calculate_roi;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn advisor_at(hour: u32) -> Advisor {
        let instant = NaiveDate::from_ymd_opt(2024, 5, 14)
            .and_then(|d| d.and_hms_opt(hour, 30, 0))
            .unwrap();
        Advisor::with_clock(Arc::new(FixedClock(instant)))
    }

    fn healthy_state() -> OptimizationState {
        OptimizationState {
            iteration: 2,
            total_improvement: 20.0,
            successful_optimizations: 4,
            failed_attempts: 1,
        }
    }

    fn trend(direction: TrendDirection) -> TrendResult {
        TrendResult {
            slope: 0.0,
            r_squared: 0.0,
            trend: direction,
        }
    }

    fn pattern(name: &str, avg: f64) -> PatternStat {
        PatternStat {
            pattern: name.to_string(),
            count: 1,
            avg_improvement: avg,
            std_improvement: 0.0,
            total_impact: avg,
            reliability: 1.0,
        }
    }

    #[test]
    fn test_healthy_run_has_no_recommendations() {
        let state = healthy_state();
        let roi = calculate_roi(&state);
        let recs = advisor_at(12).recommend(&state, &trend(TrendDirection::Improving), &roi, &[]);
        assert!(recs.is_empty());
    }

    #[test]
    fn test_degrading_has_exactly_one_stop() {
        let state = OptimizationState::default();
        let roi = calculate_roi(&state);
        let patterns = vec![pattern("inline", 3.0)];

        for hour in [0, 7, 23] {
            let recs = advisor_at(hour).recommend(
                &state,
                &trend(TrendDirection::Degrading),
                &roi,
                &patterns,
            );
            let stops = recs
                .iter()
                .filter(|r| matches!(r, Recommendation::StopSoon))
                .count();
            assert_eq!(stops, 1);
            assert!(!recs.contains(&Recommendation::AdjustParameters));
        }
    }

    #[test]
    fn test_stable_suggests_adjustment() {
        let state = healthy_state();
        let roi = calculate_roi(&state);
        let recs = advisor_at(12).recommend(&state, &trend(TrendDirection::Stable), &roi, &[]);
        assert_eq!(recs, vec![Recommendation::AdjustParameters]);
    }

    #[test]
    fn test_rule_order() {
        let state = OptimizationState {
            iteration: 10,
            total_improvement: 5.0,
            successful_optimizations: 1,
            failed_attempts: 3,
        };
        let roi = calculate_roi(&state);
        let patterns = vec![pattern("hash_lookup", 12.34), pattern("prealloc", 1.0)];

        let recs = advisor_at(6).recommend(&state, &trend(TrendDirection::Stable), &roi, &patterns);

        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0], Recommendation::AdjustParameters);
        assert!(matches!(recs[1], Recommendation::ReviewFailures { .. }));
        assert_eq!(
            recs[2],
            Recommendation::TopPattern {
                pattern: "hash_lookup".to_string(),
                avg_improvement: 12.34,
            }
        );
        assert_eq!(
            recs[3],
            Recommendation::ConservativeTargets { success_rate: 0.25 }
        );
        assert_eq!(recs[4], Recommendation::MergeReview);
    }

    #[test]
    fn test_review_hours_inclusive() {
        let state = healthy_state();
        let roi = calculate_roi(&state);
        let improving = trend(TrendDirection::Improving);

        for (hour, expected) in [(5, false), (6, true), (8, true), (9, false)] {
            let recs = advisor_at(hour).recommend(&state, &improving, &roi, &[]);
            assert_eq!(recs.contains(&Recommendation::MergeReview), expected, "hour {}", hour);
        }
    }

    #[test]
    fn test_no_attempts_counts_as_low_success() {
        let state = OptimizationState {
            iteration: 1,
            total_improvement: 10.0,
            ..Default::default()
        };
        let roi = calculate_roi(&state);
        let recs = advisor_at(12).recommend(&state, &trend(TrendDirection::NoData), &roi, &[]);
        assert_eq!(recs, vec![Recommendation::ConservativeTargets { success_rate: 0.0 }]);
    }

    #[test]
    fn test_top_pattern_display() {
        let rec = Recommendation::TopPattern {
            pattern: "memoize".to_string(),
            avg_improvement: 7.26,
        };
        assert!(rec.to_string().contains("memoize (avg 7.3% improvement)"));
    }
}
