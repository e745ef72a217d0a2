//! Telemetry for the watch loop
//!
//! Counts what each cycle did so a summary can be shown on shutdown.

use std::time::{Duration, Instant};

/// Telemetry event types
#[derive(Debug, Clone, PartialEq)]
pub enum CycleEvent {
    ReportRendered,
    ReportFailed { error: String },
    ChartWritten,
    ChartSkipped,
    ChartFailed { error: String },
}

/// Telemetry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub reports_rendered: usize,
    pub reports_failed: usize,
    pub charts_written: usize,
    pub charts_skipped: usize,
    pub charts_failed: usize,
}

/// Cycle counter owned by the watch loop
#[derive(Debug, Clone)]
pub struct CycleTelemetry {
    stats: CycleStats,
    last_error: Option<String>,
    start_time: Instant,
}

impl CycleTelemetry {
    /// Create a new collector
    pub fn new() -> Self {
        Self {
            stats: CycleStats::default(),
            last_error: None,
            start_time: Instant::now(),
        }
    }

    /// Record an event
    pub fn record(&mut self, event: CycleEvent) {
        match event {
            CycleEvent::ReportRendered => self.stats.reports_rendered += 1,
            CycleEvent::ReportFailed { error } => {
                self.stats.reports_failed += 1;
                self.last_error = Some(error);
            }
            CycleEvent::ChartWritten => self.stats.charts_written += 1,
            CycleEvent::ChartSkipped => self.stats.charts_skipped += 1,
            CycleEvent::ChartFailed { error } => {
                self.stats.charts_failed += 1;
                self.last_error = Some(error);
            }
        }
    }

    /// Get current statistics
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Most recent failure message
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Fraction of report cycles that succeeded
    pub fn report_success_rate(&self) -> f64 {
        let total = self.stats.reports_rendered + self.stats.reports_failed;
        if total == 0 {
            1.0
        } else {
            self.stats.reports_rendered as f64 / total as f64
        }
    }
}

impl Default for CycleTelemetry {
    fn default() -> Self {
        Self::new()
    }
}
