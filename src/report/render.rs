//! Text rendering of the effectiveness report

use super::EffectivenessReport;

/// Cells in a recent-improvement bar
pub const BAR_WIDTH: i64 = 20;

/// Upper bound on cells of either kind in one bar
pub const MAX_BAR_CELLS: i64 = 200;

/// Inner width of the header box
const BOX_WIDTH: usize = 66;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a percentage as a bar of `trunc(value)` filled cells
///
/// Cell counts are floored at zero, so values above 20 produce a longer bar
/// and negative values an all-empty one. Either count is capped at
/// [`MAX_BAR_CELLS`].
pub fn render_bar(value: f64) -> String {
    let filled = (value.trunc() as i64).min(MAX_BAR_CELLS);
    let empty = BAR_WIDTH.saturating_sub(filled).min(MAX_BAR_CELLS);
    format!(
        "{}{}",
        "█".repeat(filled.max(0) as usize),
        "░".repeat(empty.max(0) as usize)
    )
}

/// Render the full report as a text block
pub fn render_report(report: &EffectivenessReport) -> String {
    let mut out = String::new();
    let rule = "═".repeat(BOX_WIDTH);

    out.push('\n');
    out.push_str(&format!("╔{}╗\n", rule));
    out.push_str(&format!("║{:^width$}║\n", "KAIZEN EFFECTIVENESS ANALYSIS REPORT", width = BOX_WIDTH));
    out.push_str(&format!(
        "║{:^width$}║\n",
        report.generated_at.format(TIMESTAMP_FORMAT).to_string(),
        width = BOX_WIDTH
    ));
    out.push_str(&format!("╚{}╝\n\n", rule));

    let roi = &report.roi;
    out.push_str("📊 PERFORMANCE METRICS\n");
    out.push_str(&format!("├─ Total Improvement: {:.2}%\n", roi.total_improvement));
    out.push_str(&format!("├─ Improvement/Hour: {:.2}%\n", roi.improvement_per_hour));
    out.push_str(&format!("├─ Improvement/Iteration: {:.2}%\n", roi.improvement_per_iteration));
    out.push_str(&format!("├─ Efficiency Score: {:.1}/100\n", roi.efficiency_score));
    out.push_str(&format!("└─ Time Invested: {:.1} hours\n\n", roi.time_invested_hours));

    let trend = &report.trend;
    let eta = match report.convergence_eta {
        Some(n) => format!("{} iterations", n),
        None => "Unknown".to_string(),
    };
    out.push_str("📈 TREND ANALYSIS\n");
    out.push_str(&format!("├─ Current Trend: {}\n", trend.trend.as_str().to_uppercase()));
    out.push_str(&format!("├─ Trend Slope: {:.3}\n", trend.slope));
    out.push_str(&format!("├─ R-squared: {:.3}\n", trend.r_squared));
    out.push_str(&format!("└─ Convergence ETA: {}\n\n", eta));

    out.push_str("🎯 OPTIMIZATION PATTERNS\n");
    for (i, pattern) in report.patterns.iter().enumerate() {
        out.push_str(&format!(
            "├─ {}. {}: {:.1}% avg ({} applications)\n",
            i + 1,
            pattern.pattern,
            pattern.avg_improvement,
            pattern.count
        ));
    }

    out.push_str("\n💡 RECOMMENDATIONS\n");
    for rec in &report.recommendations {
        out.push_str(&format!("├─ {}\n", rec));
    }

    out.push_str("\n📊 RECENT IMPROVEMENTS\n");
    for entry in &report.recent {
        out.push_str(&format!(
            "├─ Iteration {}: [{}] {:.1}%\n",
            entry.iteration,
            render_bar(entry.improvement),
            entry.improvement
        ));
    }

    out.push('\n');
    out.push_str(&"═".repeat(BOX_WIDTH + 2));
    out.push('\n');
    out
}
