//! Configuration management for the Kaizen analyzer
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.kaizen-analyzer/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::analysis::DEFAULT_CONVERGENCE_THRESHOLD;
use crate::analyzer::{AnalyzerConfig, DEFAULT_RECENT_ENTRIES, DEFAULT_TOP_PATTERNS};
use crate::chart::{ChartRenderer, DEFAULT_CHART_FILE};
use crate::cli::args::{Args, Verbosity};
use crate::errors::{AnalyzerError, Result};
use crate::loader::{InputPaths, MalformedPolicy, DEFAULT_METRICS_FILE, DEFAULT_STATE_FILE};
use crate::monitor::Schedule;

/// Complete configuration for the analyzer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub schedule: ScheduleConfig,
    pub analysis: AnalysisConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub state_file: String,
    pub metrics_file: String,
    pub chart_file: String,

    /// TrueType font for chart text; a system font is tried when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_font: Option<String>,
}

/// Timer cadence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub report_interval_secs: u64,
    pub chart_interval_secs: u64,
    pub charts_enabled: bool,
}

/// Analysis tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub convergence_threshold: f64,
    pub top_patterns: usize,
    pub recent_entries: usize,
}

/// Input handling
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub on_malformed: MalformedPolicy,
}

/// Terminal display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub clear_screen: bool,
    pub color_output: bool,
    pub default_verbosity: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: DEFAULT_STATE_FILE.to_string(),
            metrics_file: DEFAULT_METRICS_FILE.to_string(),
            chart_file: DEFAULT_CHART_FILE.to_string(),
            chart_font: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let schedule = Schedule::default();
        Self {
            report_interval_secs: schedule.report_interval.as_secs(),
            chart_interval_secs: schedule.chart_interval.as_secs(),
            charts_enabled: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            top_patterns: DEFAULT_TOP_PATTERNS,
            recent_entries: DEFAULT_RECENT_ENTRIES,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            clear_screen: true,
            color_output: true,
            default_verbosity: "normal".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AnalyzerError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AnalyzerError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".kaizen-analyzer").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.schedule.report_interval_secs == 0 {
            return Err(AnalyzerError::ConfigError(
                "report_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.schedule.chart_interval_secs < self.schedule.report_interval_secs {
            return Err(AnalyzerError::ConfigError(
                "chart_interval_secs must not be shorter than report_interval_secs".to_string(),
            ));
        }

        let threshold = self.analysis.convergence_threshold;
        if threshold.is_nan() || threshold <= 0.0 {
            return Err(AnalyzerError::ConfigError(
                "convergence_threshold must be greater than 0.0".to_string(),
            ));
        }

        if Verbosity::parse(&self.display.default_verbosity).is_none() {
            return Err(AnalyzerError::ConfigError(format!(
                "Invalid verbosity level: {}",
                self.display.default_verbosity
            )));
        }

        Ok(())
    }

    /// Apply command-line overrides and re-validate
    pub fn apply_args(&mut self, args: &Args) -> Result<()> {
        if let Some(state) = &args.state {
            self.paths.state_file = state.to_string_lossy().into_owned();
        }
        if let Some(metrics) = &args.metrics {
            self.paths.metrics_file = metrics.to_string_lossy().into_owned();
        }
        if let Some(chart) = &args.chart {
            self.paths.chart_file = chart.to_string_lossy().into_owned();
        }
        if let Some(font) = &args.chart_font {
            self.paths.chart_font = Some(font.to_string_lossy().into_owned());
        }
        if let Some(secs) = args.report_interval {
            self.schedule.report_interval_secs = secs;
        }
        if let Some(secs) = args.chart_interval {
            self.schedule.chart_interval_secs = secs;
        }
        if args.no_chart {
            self.schedule.charts_enabled = false;
        }
        if args.no_clear {
            self.display.clear_screen = false;
        }
        if args.lenient {
            self.input.on_malformed = MalformedPolicy::UseDefaults;
        }
        if let Some(verbosity) = args.verbosity_override() {
            self.display.default_verbosity = verbosity.as_str().to_string();
        }

        self.validate()
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AnalyzerError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AnalyzerError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AnalyzerError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Effective verbosity
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::parse(&self.display.default_verbosity).unwrap_or(Verbosity::Normal)
    }

    /// Input file locations
    pub fn input_paths(&self) -> InputPaths {
        InputPaths {
            state_file: Self::expand_path(&self.paths.state_file),
            metrics_file: Self::expand_path(&self.paths.metrics_file),
        }
    }

    /// Chart output location
    pub fn chart_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.chart_file)
    }

    /// Chart renderer using the configured font, or a system font if none is set
    pub fn chart_renderer(&self) -> Result<ChartRenderer> {
        let renderer = ChartRenderer::new(self.chart_path());
        match &self.paths.chart_font {
            Some(font) => renderer.with_font(&Self::expand_path(font)),
            None => Ok(renderer.with_system_font()),
        }
    }

    /// Analyzer settings
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            convergence_threshold: self.analysis.convergence_threshold,
            top_patterns: self.analysis.top_patterns,
            recent_entries: self.analysis.recent_entries,
        }
    }

    /// Timer settings
    pub fn schedule(&self) -> Schedule {
        Schedule {
            report_interval: Duration::from_secs(self.schedule.report_interval_secs),
            chart_interval: Duration::from_secs(self.schedule.chart_interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.paths.state_file, "optimization_state.json");
        assert_eq!(config.paths.metrics_file, "kaizen_metrics.json");
        assert_eq!(config.paths.chart_file, "kaizen_analysis.png");
        assert_eq!(config.schedule.report_interval_secs, 30);
        assert_eq!(config.schedule.chart_interval_secs, 300);
        assert_eq!(config.analysis.convergence_threshold, 0.05);
        assert_eq!(config.input.on_malformed, MalformedPolicy::Fail);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = Config::default();
        config.schedule.report_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_chart_faster_than_report() {
        let mut config = Config::default();
        config.schedule.chart_interval_secs = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_threshold() {
        let mut config = Config::default();
        config.analysis.convergence_threshold = 0.0;
        assert!(config.validate().is_err());
        config.analysis.convergence_threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_verbosity() {
        let mut config = Config::default();
        config.display.default_verbosity = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[schedule]\nreport_interval_secs = 10\n\n[input]\non_malformed = \"defaults\"\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.schedule.report_interval_secs, 10);
        assert_eq!(config.schedule.chart_interval_secs, 300);
        assert_eq!(config.input.on_malformed, MalformedPolicy::UseDefaults);
        assert_eq!(config.paths.state_file, "optimization_state.json");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.paths.chart_file = "out/chart.png".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.paths.chart_file, "out/chart.png");
    }

    #[test]
    fn test_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[schedule\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, AnalyzerError::ConfigError(_)));
    }

    #[test]
    fn test_apply_args() {
        let args = Args::parse_from([
            "kaizen-analyzer",
            "--chart",
            "plots/k.png",
            "--report-interval",
            "5",
            "--chart-interval",
            "60",
            "--no-clear",
            "--lenient",
            "-v",
        ]);

        let mut config = Config::default();
        config.apply_args(&args).unwrap();

        assert_eq!(config.chart_path(), PathBuf::from("plots/k.png"));
        assert_eq!(config.schedule().report_interval, Duration::from_secs(5));
        assert_eq!(config.schedule().chart_interval, Duration::from_secs(60));
        assert!(!config.display.clear_screen);
        assert_eq!(config.input.on_malformed, MalformedPolicy::UseDefaults);
        assert_eq!(config.verbosity(), Verbosity::Verbose);
    }

    #[test]
    fn test_configured_font_must_exist() {
        let args = Args::parse_from(["kaizen-analyzer", "--chart-font", "/no/such/font.ttf"]);
        let mut config = Config::default();
        config.apply_args(&args).unwrap();

        assert_eq!(config.paths.chart_font.as_deref(), Some("/no/such/font.ttf"));
        assert!(config.chart_renderer().is_err());
    }

    #[test]
    fn test_default_config_toml_omits_font() {
        let toml = Config::default().to_toml().unwrap();
        assert!(!toml.contains("chart_font"));
        assert!(Config::default().chart_renderer().is_ok());
    }

    #[test]
    fn test_apply_args_rejects_invalid_override() {
        let args = Args::parse_from(["kaizen-analyzer", "--report-interval", "0"]);
        let mut config = Config::default();
        assert!(config.apply_args(&args).is_err());
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path("~/.kaizen-analyzer");
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_string_lossy().contains('~'));
        }
    }

    #[test]
    fn test_expand_path_without_tilde() {
        assert_eq!(Config::expand_path("data/state.json"), PathBuf::from("data/state.json"));
    }
}
