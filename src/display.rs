//! Terminal display for the watch loop
//!
//! Writes the rendered report and short status lines to any `Write` sink;
//! the binary uses stdout.

use colored::*;
use crossterm::{
    cursor, queue,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

use crate::telemetry::CycleTelemetry;

/// Report display
pub struct TerminalDisplay<W: Write> {
    out: W,
    clear_screen: bool,
}

impl TerminalDisplay<io::Stdout> {
    /// Display on stdout
    pub fn stdout(clear_screen: bool) -> Self {
        Self::new(io::stdout(), clear_screen)
    }
}

impl<W: Write> TerminalDisplay<W> {
    /// Create display on a custom sink
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    /// Show welcome banner
    pub fn show_banner(&mut self, version: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            format!("Starting Kaizen Effectiveness Analyzer {}...", version).bold().cyan()
        )?;
        writeln!(self.out, "{}\n", "Press Ctrl+C to stop".dimmed())?;
        self.out.flush()
    }

    /// Replace the screen contents with a report
    pub fn show_report(&mut self, report: &str) -> io::Result<()> {
        if self.clear_screen {
            queue!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        }
        writeln!(self.out, "{}", report)?;
        self.out.flush()
    }

    /// Display info message
    pub fn show_info(&mut self, info: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "📊".cyan(), info)?;
        self.out.flush()
    }

    /// Display error message
    pub fn show_error(&mut self, error: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", "Error:".red().bold(), error.red())?;
        self.out.flush()
    }

    /// Display shutdown summary
    pub fn show_summary(&mut self, telemetry: &CycleTelemetry) -> io::Result<()> {
        let stats = telemetry.stats();
        writeln!(self.out, "\n{}", "Analysis Summary".bold().cyan())?;
        writeln!(self.out, "{}", "─".repeat(37))?;
        writeln!(self.out, "Duration:          {}s", telemetry.elapsed().as_secs())?;
        writeln!(self.out, "Reports rendered:  {}", stats.reports_rendered)?;
        writeln!(self.out, "Report failures:   {}", stats.reports_failed)?;
        writeln!(self.out, "Charts written:    {}", stats.charts_written)?;
        writeln!(self.out, "Charts skipped:    {}", stats.charts_skipped)?;
        writeln!(self.out, "Chart failures:    {}", stats.charts_failed)?;
        writeln!(
            self.out,
            "Report success:    {:.1}%",
            telemetry.report_success_rate() * 100.0
        )?;
        if let Some(error) = telemetry.last_error() {
            writeln!(self.out, "Last error:        {}", error.red())?;
        }
        self.out.flush()
    }

    /// Consume the display and return the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::CycleEvent;

    fn output(display: TerminalDisplay<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    #[test]
    fn test_show_report_without_clear() {
        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.show_report("REPORT BODY").unwrap();
        assert_eq!(output(display), "REPORT BODY\n");
    }

    #[test]
    fn test_show_report_with_clear() {
        let mut display = TerminalDisplay::new(Vec::new(), true);
        display.show_report("REPORT BODY").unwrap();
        let text = output(display);
        assert!(text.starts_with('\u{1b}'));
        assert!(text.ends_with("REPORT BODY\n"));
    }

    #[test]
    fn test_summary_lists_counts() {
        let mut telemetry = CycleTelemetry::new();
        for _ in 0..3 {
            telemetry.record(CycleEvent::ReportRendered);
        }
        telemetry.record(CycleEvent::ChartWritten);

        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.show_summary(&telemetry).unwrap();
        let text = output(display);
        assert!(text.contains("Reports rendered:  3"));
        assert!(text.contains("Charts written:    1"));
        assert!(text.contains("Report success:    100.0%"));
        assert!(!text.contains("Last error:"));
    }

    #[test]
    fn test_summary_shows_last_error() {
        let mut telemetry = CycleTelemetry::new();
        telemetry.record(CycleEvent::ReportRendered);
        telemetry.record(CycleEvent::ReportFailed {
            error: "Malformed input kaizen_metrics.json".to_string(),
        });

        let mut display = TerminalDisplay::new(Vec::new(), false);
        display.show_summary(&telemetry).unwrap();
        let text = output(display);
        assert!(text.contains("Report success:    50.0%"));
        assert!(text.contains("Last error:"));
        assert!(text.contains("Malformed input kaizen_metrics.json"));
    }
}
