//! Watch loop
//!
//! Two independent timers drive the loop: a short report tick (first tick
//! immediately) and a longer chart tick (first tick after one full period).
//! The loop ends when the shutdown future resolves, after which one final
//! chart is rendered.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};

use crate::analyzer::EffectivenessAnalyzer;
use crate::chart::ChartRenderer;
use crate::display::TerminalDisplay;
use crate::errors::{AnalyzerError, Result};
use crate::report::render_report;
use crate::telemetry::{CycleEvent, CycleTelemetry};

/// Default report cadence
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Default chart cadence
pub const DEFAULT_CHART_INTERVAL: Duration = Duration::from_secs(300);

/// Timer configuration
#[derive(Debug, Clone)]
pub struct Schedule {
    pub report_interval: Duration,
    pub chart_interval: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            report_interval: DEFAULT_REPORT_INTERVAL,
            chart_interval: DEFAULT_CHART_INTERVAL,
        }
    }
}

/// Periodic report and chart driver
pub struct Monitor<W: Write> {
    analyzer: EffectivenessAnalyzer,
    charts: Option<ChartRenderer>,
    display: TerminalDisplay<W>,
    schedule: Schedule,
    telemetry: CycleTelemetry,
}

impl<W: Write> Monitor<W> {
    /// Create monitor; `charts = None` disables chart rendering
    pub fn new(
        analyzer: EffectivenessAnalyzer,
        charts: Option<ChartRenderer>,
        display: TerminalDisplay<W>,
        schedule: Schedule,
    ) -> Self {
        Self {
            analyzer,
            charts,
            display,
            schedule,
            telemetry: CycleTelemetry::new(),
        }
    }

    /// Run until `shutdown` resolves
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut report_tick = interval(self.schedule.report_interval);
        report_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let chart_period = self.schedule.chart_interval;
        let mut chart_tick = interval_at(Instant::now() + chart_period, chart_period);
        chart_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let charts_enabled = self.charts.is_some();

        tracing::info!(
            report_secs = self.schedule.report_interval.as_secs_f64(),
            chart_secs = chart_period.as_secs_f64(),
            charts_enabled,
            "watch loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = report_tick.tick() => {
                    if let Err(e) = self.report_cycle() {
                        tracing::error!(error = %e, "display write failed, stopping");
                        break;
                    }
                }
                _ = chart_tick.tick(), if charts_enabled => {
                    if self.chart_cycle().await {
                        if let Some(path) = self.chart_path() {
                            let shown = self
                                .display
                                .show_info(&format!("Analysis plots saved to {}", path));
                            if let Err(e) = shown {
                                tracing::error!(error = %e, "display write failed, stopping");
                                break;
                            }
                        }
                    }
                }
            }
        }

        tracing::info!("watch loop stopping");
        let final_chart = charts_enabled && self.chart_cycle().await;

        self.display.show_info("Analysis stopped.")?;
        if final_chart {
            if let Some(path) = self.chart_path() {
                self.display.show_info(&format!("Final analysis saved to {}", path))?;
            }
        }

        self.display.show_summary(&self.telemetry)?;
        Ok(())
    }

    /// Render one report to the display
    ///
    /// Analysis failures are shown and recorded; only display I/O errors
    /// are returned.
    pub fn report_cycle(&mut self) -> Result<()> {
        match self.analyzer.generate_report() {
            Ok(report) => {
                self.display.show_report(&render_report(&report))?;
                self.telemetry.record(CycleEvent::ReportRendered);
            }
            Err(e) => {
                tracing::error!(error = %e, "report cycle failed");
                self.display.show_error(&e.to_string())?;
                self.telemetry.record(CycleEvent::ReportFailed {
                    error: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Render one chart; returns whether a file was written
    pub async fn chart_cycle(&mut self) -> bool {
        let renderer = match &self.charts {
            Some(renderer) => renderer.clone(),
            None => return false,
        };

        let outcome = match self.analyzer.snapshot() {
            Ok(snapshot) => tokio::task::spawn_blocking(move || renderer.render_snapshot(&snapshot))
                .await
                .unwrap_or_else(|e| Err(AnalyzerError::ChartError(e.to_string()))),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(true) => {
                self.telemetry.record(CycleEvent::ChartWritten);
                true
            }
            Ok(false) => {
                self.telemetry.record(CycleEvent::ChartSkipped);
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "chart cycle failed");
                self.telemetry.record(CycleEvent::ChartFailed {
                    error: e.to_string(),
                });
                false
            }
        }
    }

    fn chart_path(&self) -> Option<String> {
        self.charts
            .as_ref()
            .map(|c| c.output().display().to_string())
    }

    /// Get telemetry
    pub fn telemetry(&self) -> &CycleTelemetry {
        &self.telemetry
    }

    /// Consume the monitor and return its display
    pub fn into_display(self) -> TerminalDisplay<W> {
        self.display
    }
}
