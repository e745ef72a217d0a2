//! Effectiveness analyzer
//!
//! Loads both input documents and runs every statistic group over them.
//! Nothing is carried between calls: each report reflects the files as they
//! are on disk at that moment.

use std::sync::Arc;

use crate::advisor::Advisor;
use crate::analysis::{
    analyze_trend, calculate_roi, identify_patterns, ConvergencePredictor, TrendResult,
};
use crate::clock::{Clock, SystemClock};
use crate::errors::Result;
use crate::loader::InputLoader;
use crate::report::EffectivenessReport;
use crate::types::{MetricsLog, OptimizationState};

/// Patterns listed in the report by default
pub const DEFAULT_TOP_PATTERNS: usize = 5;

/// Recent improvements listed in the report by default
pub const DEFAULT_RECENT_ENTRIES: usize = 5;

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Improvement below which the run counts as converged
    pub convergence_threshold: f64,

    /// Number of patterns in the report
    pub top_patterns: usize,

    /// Number of recent improvements in the report
    pub recent_entries: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: crate::analysis::DEFAULT_CONVERGENCE_THRESHOLD,
            top_patterns: DEFAULT_TOP_PATTERNS,
            recent_entries: DEFAULT_RECENT_ENTRIES,
        }
    }
}

/// Both input documents as read in one cycle
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub state: OptimizationState,
    pub metrics: MetricsLog,
}

/// Reads inputs and produces effectiveness reports
#[derive(Clone)]
pub struct EffectivenessAnalyzer {
    loader: InputLoader,
    config: AnalyzerConfig,
    predictor: ConvergencePredictor,
    advisor: Advisor,
    clock: Arc<dyn Clock>,
}

impl EffectivenessAnalyzer {
    /// Create analyzer reading the system clock
    pub fn new(loader: InputLoader, config: AnalyzerConfig) -> Self {
        Self::with_clock(loader, config, Arc::new(SystemClock))
    }

    /// Create analyzer with a custom clock
    pub fn with_clock(loader: InputLoader, config: AnalyzerConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            predictor: ConvergencePredictor::with_threshold(config.convergence_threshold),
            advisor: Advisor::with_clock(clock.clone()),
            loader,
            config,
            clock,
        }
    }

    /// Read both input documents
    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            state: self.loader.load_state()?,
            metrics: self.loader.load_metrics()?,
        })
    }

    /// Load inputs and build a report
    pub fn generate_report(&self) -> Result<EffectivenessReport> {
        let snapshot = self.snapshot()?;
        Ok(self.build_report(&snapshot))
    }

    /// Build a report from already loaded inputs
    pub fn build_report(&self, snapshot: &Snapshot) -> EffectivenessReport {
        let improvements = snapshot.metrics.improvements();

        let trend = if improvements.is_empty() {
            TrendResult::no_data()
        } else {
            analyze_trend(&improvements)
        };
        let roi = calculate_roi(&snapshot.state);
        let patterns = identify_patterns(&snapshot.metrics.optimizations_applied);
        let convergence_eta = self.predictor.predict(&improvements);
        let recommendations = self
            .advisor
            .recommend(&snapshot.state, &trend, &roi, &patterns);

        tracing::debug!(
            history = improvements.len(),
            patterns = patterns.len(),
            trend = %trend.trend,
            "report built"
        );

        EffectivenessReport {
            generated_at: self.clock.now(),
            roi,
            trend,
            convergence_eta,
            patterns: patterns.into_iter().take(self.config.top_patterns).collect(),
            recommendations,
            recent: EffectivenessReport::recent_from(&improvements, self.config.recent_entries),
        }
    }

    /// Get input loader
    pub fn loader(&self) -> &InputLoader {
        &self.loader
    }

    /// Get configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TrendDirection;
    use crate::clock::FixedClock;
    use crate::loader::{InputPaths, MalformedPolicy};
    use crate::types::{AppliedOptimization, ImprovementEntry};
    use chrono::NaiveDate;

    fn test_analyzer() -> EffectivenessAnalyzer {
        let noon = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let loader = InputLoader::new(
            InputPaths {
                state_file: "does/not/exist/state.json".into(),
                metrics_file: "does/not/exist/metrics.json".into(),
            },
            MalformedPolicy::Fail,
        );
        EffectivenessAnalyzer::with_clock(loader, AnalyzerConfig::default(), Arc::new(FixedClock(noon)))
    }

    fn history(values: &[f64]) -> Vec<ImprovementEntry> {
        values.iter().map(|&improvement| ImprovementEntry { improvement }).collect()
    }

    #[test]
    fn test_empty_history_report() {
        let report = test_analyzer().generate_report().unwrap();

        assert_eq!(report.trend.trend, TrendDirection::NoData);
        assert!(report.recent.is_empty());
        assert!(report.patterns.is_empty());
        assert_eq!(report.convergence_eta, None);
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let snapshot = Snapshot {
            metrics: MetricsLog {
                improvement_history: history(&[3.0]),
                ..Default::default()
            },
            ..Default::default()
        };
        let report = test_analyzer().build_report(&snapshot);
        assert_eq!(report.trend.trend, TrendDirection::InsufficientData);
        assert_eq!(report.recent.len(), 1);
    }

    #[test]
    fn test_limits_patterns_and_recent() {
        let applied: Vec<AppliedOptimization> = (0..8)
            .map(|i| AppliedOptimization {
                pattern: format!("p{}", i),
                improvement: i as f64,
            })
            .collect();
        let snapshot = Snapshot {
            state: OptimizationState {
                iteration: 8,
                total_improvement: 28.0,
                successful_optimizations: 8,
                failed_attempts: 0,
            },
            metrics: MetricsLog {
                improvement_history: history(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]),
                optimizations_applied: applied,
            },
        };

        let report = test_analyzer().build_report(&snapshot);
        assert_eq!(report.patterns.len(), 5);
        assert_eq!(report.patterns[0].pattern, "p7");
        assert_eq!(report.recent.len(), 5);
        assert_eq!(report.recent[0].iteration, 4);
        assert_eq!(report.trend.trend, TrendDirection::Improving);
    }
}
