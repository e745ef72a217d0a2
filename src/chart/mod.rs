//! Chart rendering
//!
//! Four panels on a 2x2 bitmap: improvement trend with its fit line,
//! cumulative improvement, top patterns by total impact and the rolling
//! efficiency score. Titles, axis labels, the trend legend and bar values
//! need a TrueType font; without one the panels are drawn bare.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};

use crate::analysis::{cumulative, efficiency_curve, identify_patterns, LinearFit};
use crate::analyzer::Snapshot;
use crate::errors::{AnalyzerError, Result};

/// Default chart output file
pub const DEFAULT_CHART_FILE: &str = "kaizen_analysis.png";

/// Fonts tried when none is configured
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Family name chart text is drawn with
const FONT_FAMILY: &str = "sans-serif";

/// Patterns shown in the bar panel
const CHART_PATTERNS: usize = 5;

/// Pattern names are cut to this many characters
const PATTERN_NAME_LIMIT: usize = 15;

/// Upper bound of the efficiency panel
const EFFICIENCY_CEILING: f64 = 120.0;

const PURPLE: RGBColor = RGBColor(128, 0, 128);
const GRAY: RGBColor = RGBColor(128, 128, 128);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Series plotted in the chart, all x values 1-based iterations
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// (iteration, improvement)
    pub improvements: Vec<(f64, f64)>,

    /// Fit line evaluated at every iteration, when there are two or more points
    pub fit_line: Option<Vec<(f64, f64)>>,

    /// Slope of the fit line
    pub trend_slope: Option<f64>,

    /// (iteration, cumulative improvement)
    pub cumulative: Vec<(f64, f64)>,

    /// (truncated name, total impact), highest total impact first
    pub patterns: Vec<(String, f64)>,

    /// (iteration, efficiency), only with more than two points
    pub efficiency: Option<Vec<(f64, f64)>>,
}

impl ChartData {
    /// Build chart series; `None` when there is no improvement history
    pub fn from_snapshot(snapshot: &Snapshot) -> Option<Self> {
        let values = snapshot.metrics.improvements();
        if values.is_empty() {
            return None;
        }

        let iterations = || (1..=values.len()).map(|i| i as f64);

        let fit = LinearFit::over_indices(&values);
        let fit_line = fit.map(|fit| iterations().map(|x| (x, fit.at(x - 1.0))).collect());

        let efficiency = if values.len() > 2 {
            Some(iterations().zip(efficiency_curve(&values)).collect())
        } else {
            None
        };

        let patterns = identify_patterns(&snapshot.metrics.optimizations_applied)
            .into_iter()
            .take(CHART_PATTERNS)
            .map(|p| {
                let name: String = p.pattern.chars().take(PATTERN_NAME_LIMIT).collect();
                (name, p.total_impact)
            })
            .collect();

        Some(Self {
            improvements: iterations().zip(values.iter().copied()).collect(),
            fit_line,
            trend_slope: fit.map(|fit| fit.slope),
            cumulative: iterations().zip(cumulative(&values)).collect(),
            patterns,
            efficiency,
        })
    }
}

/// Register a TrueType font file for chart text
///
/// The font data lives for the rest of the process.
pub fn register_font_file(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).map_err(|e| {
        AnalyzerError::ChartError(format!("Failed to read font {}: {}", path.display(), e))
    })?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());

    plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        AnalyzerError::ChartError(format!("Invalid font {}", path.display()))
    })
}

/// Writes the four-panel chart as a PNG
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output: PathBuf,
    width: u32,
    height: u32,
    labels: bool,
}

impl ChartRenderer {
    /// Create renderer writing to `output`, without text
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            width: 1800,
            height: 1200,
            labels: false,
        }
    }

    /// Set image size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Draw text with the font at `path`
    pub fn with_font(mut self, path: &Path) -> Result<Self> {
        register_font_file(path)?;
        self.labels = true;
        Ok(self)
    }

    /// Draw text with the first usable system font, if any
    pub fn with_system_font(mut self) -> Self {
        for candidate in SYSTEM_FONT_CANDIDATES {
            let path = Path::new(candidate);
            if !path.exists() {
                continue;
            }
            match register_font_file(path) {
                Ok(()) => {
                    tracing::debug!(font = %path.display(), "chart font loaded");
                    self.labels = true;
                    return self;
                }
                Err(e) => tracing::debug!(error = %e, "chart font skipped"),
            }
        }
        tracing::debug!("no system font found, chart drawn without text");
        self
    }

    /// Whether titles and labels are drawn
    pub fn labels(&self) -> bool {
        self.labels
    }

    /// Get output path
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Render the snapshot; returns `false` when there was nothing to plot
    pub fn render_snapshot(&self, snapshot: &Snapshot) -> Result<bool> {
        match ChartData::from_snapshot(snapshot) {
            Some(data) => {
                self.render(&data)?;
                Ok(true)
            }
            None => {
                tracing::debug!("no improvement history, chart skipped");
                Ok(false)
            }
        }
    }

    /// Render chart data to the output file
    pub fn render(&self, data: &ChartData) -> Result<()> {
        let root = BitMapBackend::new(&self.output, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let body = if self.labels {
            root.titled("Kaizen Optimization Analysis", (FONT_FAMILY, 32).into_font())
                .map_err(chart_err)?
        } else {
            root.clone()
        };

        let panels = body.split_evenly((2, 2));
        draw_trend(&panels[0], data, self.labels)?;
        draw_cumulative(&panels[1], data, self.labels)?;
        draw_patterns(&panels[2], data, self.labels)?;
        draw_efficiency(&panels[3], data, self.labels)?;

        root.present().map_err(chart_err)?;
        tracing::info!(path = %self.output.display(), "chart written");
        Ok(())
    }
}

fn chart_err<E: std::fmt::Display>(err: E) -> AnalyzerError {
    AnalyzerError::ChartError(err.to_string())
}

/// Padded y range covering all finite values and `extra`
fn y_range(values: impl Iterator<Item = f64>, extra: &[f64]) -> std::ops::Range<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values.chain(extra.iter().copied()).filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.1).max(0.5);
    (lo - pad)..(hi + pad)
}

fn x_range(points: usize) -> std::ops::Range<f64> {
    0.5..(points.max(1) as f64 + 0.5)
}

fn frame(area: &Panel<'_>) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    area.draw(&Rectangle::new(
        [(0, 0), (w as i32 - 1, h as i32 - 1)],
        BLACK.stroke_width(1),
    ))
    .map_err(chart_err)
}

/// Chart builder with caption and label areas when text is enabled
fn builder<'a, 'b>(
    area: &'a Panel<'b>,
    title: &str,
    labels: bool,
) -> ChartBuilder<'a, 'static, BitMapBackend<'b>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(20);
    if labels {
        builder
            .caption(title, (FONT_FAMILY, 22).into_font())
            .x_label_area_size(40)
            .y_label_area_size(60);
    }
    builder
}

fn draw_trend(area: &Panel<'_>, data: &ChartData, labels: bool) -> Result<()> {
    frame(area)?;
    let mut chart = builder(area, "Improvement Trend", labels)
        .build_cartesian_2d(
            x_range(data.improvements.len()),
            y_range(data.improvements.iter().map(|p| p.1), &[]),
        )
        .map_err(chart_err)?;

    if labels {
        chart
            .configure_mesh()
            .x_desc("Iteration")
            .y_desc("Improvement (%)")
            .draw()
            .map_err(chart_err)?;
    }

    chart
        .draw_series(LineSeries::new(data.improvements.iter().copied(), BLUE.stroke_width(2)))
        .map_err(chart_err)?;
    chart
        .draw_series(
            data.improvements
                .iter()
                .map(|&p| Circle::new(p, 5, BLUE.filled())),
        )
        .map_err(chart_err)?;

    if let (Some(fit), Some(slope)) = (&data.fit_line, data.trend_slope) {
        chart
            .draw_series(LineSeries::new(fit.iter().copied(), RED.mix(0.8)))
            .map_err(chart_err)?
            .label(format!("Trend: {:.3}", slope))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.mix(0.8)));

        if labels {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(chart_err)?;
        }
    }
    Ok(())
}

fn draw_cumulative(area: &Panel<'_>, data: &ChartData, labels: bool) -> Result<()> {
    frame(area)?;
    let mut chart = builder(area, "Total Performance Gain", labels)
        .build_cartesian_2d(
            x_range(data.cumulative.len()),
            y_range(data.cumulative.iter().map(|p| p.1), &[0.0]),
        )
        .map_err(chart_err)?;

    if labels {
        chart
            .configure_mesh()
            .x_desc("Iteration")
            .y_desc("Cumulative Improvement (%)")
            .draw()
            .map_err(chart_err)?;
    }

    chart
        .draw_series(
            AreaSeries::new(data.cumulative.iter().copied(), 0.0, GREEN.mix(0.3))
                .border_style(GREEN.stroke_width(2)),
        )
        .map_err(chart_err)?;
    Ok(())
}

fn draw_patterns(area: &Panel<'_>, data: &ChartData, labels: bool) -> Result<()> {
    frame(area)?;
    if data.patterns.is_empty() {
        return Ok(());
    }

    let mut chart = builder(area, "Pattern Effectiveness", labels)
        .build_cartesian_2d(
            (0..data.patterns.len()).into_segmented(),
            y_range(data.patterns.iter().map(|p| p.1), &[0.0]),
        )
        .map_err(chart_err)?;

    if labels {
        let name_of = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => data
                .patterns
                .get(*i)
                .map(|p| p.0.clone())
                .unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.patterns.len())
            .x_label_formatter(&name_of)
            .x_desc("Optimization Pattern")
            .y_desc("Total Impact (%)")
            .draw()
            .map_err(chart_err)?;
    }

    chart
        .draw_series(data.patterns.iter().enumerate().map(|(i, (_, impact))| {
            Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *impact)],
                SKY_BLUE.filled(),
            )
        }))
        .map_err(chart_err)?;

    if labels {
        let value_style = TextStyle::from((FONT_FAMILY, 16).into_font())
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart
            .draw_series(data.patterns.iter().enumerate().map(|(i, (_, impact))| {
                Text::new(
                    format!("{:.1}", impact),
                    (SegmentValue::CenterOf(i), *impact),
                    value_style.clone(),
                )
            }))
            .map_err(chart_err)?;
    }
    Ok(())
}

fn draw_efficiency(area: &Panel<'_>, data: &ChartData, labels: bool) -> Result<()> {
    frame(area)?;
    let points = match &data.efficiency {
        Some(points) => points,
        None => return Ok(()),
    };

    let x = x_range(points.len());
    let mut chart = builder(area, "Optimization Efficiency", labels)
        .build_cartesian_2d(x.clone(), 0.0..EFFICIENCY_CEILING)
        .map_err(chart_err)?;

    if labels {
        chart
            .configure_mesh()
            .x_desc("Iteration")
            .y_desc("Efficiency Score")
            .draw()
            .map_err(chart_err)?;
    }

    for (level, color) in [(100.0, GRAY.mix(0.5)), (50.0, RED.mix(0.5))] {
        chart
            .draw_series(LineSeries::new(vec![(x.start, level), (x.end, level)], color))
            .map_err(chart_err)?;
    }

    let clamped = points
        .iter()
        .map(|&(i, e)| (i, e.clamp(0.0, EFFICIENCY_CEILING)));
    chart
        .draw_series(LineSeries::new(clamped.clone(), PURPLE.stroke_width(2)))
        .map_err(chart_err)?;
    chart
        .draw_series(clamped.map(|p| Rectangle::new(
            [(p.0 - 0.05, p.1 - 1.0), (p.0 + 0.05, p.1 + 1.0)],
            PURPLE.filled(),
        )))
        .map_err(chart_err)?;
    Ok(())
}
