//! Command-line argument parsing for the Kaizen analyzer
//!
//! Provides clap-based CLI with subcommands and verbosity control.
//! Flags override values from the configuration file.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kaizen effectiveness analyzer - trend, ROI and pattern report for an optimization loop
#[derive(Parser, Debug)]
#[command(name = "kaizen-analyzer")]
#[command(version)]
#[command(about = "Real-time effectiveness analysis of an iterative optimization loop", long_about = None)]
pub struct Args {
    /// Optimization state file
    #[arg(long, value_name = "PATH")]
    pub state: Option<PathBuf>,

    /// Metrics log file
    #[arg(long, value_name = "PATH")]
    pub metrics: Option<PathBuf>,

    /// Chart output file (PNG)
    #[arg(long, value_name = "PATH")]
    pub chart: Option<PathBuf>,

    /// TrueType font for chart titles and labels
    #[arg(long, value_name = "PATH")]
    pub chart_font: Option<PathBuf>,

    /// Seconds between reports
    #[arg(long, value_name = "SECS")]
    pub report_interval: Option<u64>,

    /// Seconds between chart renders
    #[arg(long, value_name = "SECS")]
    pub chart_interval: Option<u64>,

    /// Do not clear the screen before each report
    #[arg(long)]
    pub no_clear: bool,

    /// Disable chart rendering
    #[arg(long)]
    pub no_chart: bool,

    /// Treat malformed input files as empty instead of failing the cycle
    #[arg(long)]
    pub lenient: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand (defaults to `watch`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Re-render the report on a fixed cadence until interrupted
    Watch,

    /// Print one report and exit
    Report {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the chart once and exit
    Chart,

    /// Display effective configuration
    Config {
        /// Write it to the config file (`--config` or the default location)
        #[arg(long)]
        save: bool,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Verbosity from flags, `None` when neither -q nor -v was given
    pub fn verbosity_override(&self) -> Option<Verbosity> {
        if self.quiet {
            Some(Verbosity::Quiet)
        } else {
            match self.verbose {
                0 => None,
                1 => Some(Verbosity::Verbose),
                _ => Some(Verbosity::VeryVerbose),
            }
        }
    }

    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity_override().unwrap_or(Verbosity::Normal)
    }

    /// Selected command
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Watch)
    }
}

impl Verbosity {
    /// Parse from configuration string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quiet" => Some(Verbosity::Quiet),
            "normal" => Some(Verbosity::Normal),
            "verbose" => Some(Verbosity::Verbose),
            "very_verbose" => Some(Verbosity::VeryVerbose),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(std::iter::once("kaizen-analyzer").chain(args.iter().copied()))
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(parse(&["-q"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        let args = parse(&[]);
        assert_eq!(args.verbosity(), Verbosity::Normal);
        assert_eq!(args.verbosity_override(), None);
    }

    #[test]
    fn test_verbosity_verbose() {
        assert_eq!(parse(&["-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["-vvv"]).verbosity(), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["kaizen-analyzer", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_command_is_watch() {
        assert_eq!(parse(&[]).command(), Commands::Watch);
    }

    #[test]
    fn test_report_json() {
        let args = parse(&["report", "--json"]);
        assert_eq!(args.command(), Commands::Report { json: true });
    }

    #[test]
    fn test_config_save() {
        assert_eq!(parse(&["config"]).command(), Commands::Config { save: false });
        assert_eq!(parse(&["config", "--save"]).command(), Commands::Config { save: true });
    }

    #[test]
    fn test_path_and_interval_flags() {
        let args = parse(&[
            "--state",
            "/tmp/s.json",
            "--metrics",
            "/tmp/m.json",
            "--report-interval",
            "5",
            "--no-chart",
            "--lenient",
        ]);
        assert_eq!(args.state, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(args.metrics, Some(PathBuf::from("/tmp/m.json")));
        assert_eq!(args.report_interval, Some(5));
        assert!(args.no_chart);
        assert!(args.lenient);
        assert!(!args.no_clear);
    }

    #[test]
    fn test_verbosity_methods() {
        assert_eq!(Verbosity::parse("very_verbose"), Some(Verbosity::VeryVerbose));
        assert_eq!(Verbosity::parse("loud"), None);
        assert_eq!(Verbosity::Quiet.as_str(), "quiet");
        assert_eq!(Verbosity::Normal.log_filter(), "warn");
        assert_eq!(Verbosity::VeryVerbose.log_filter(), "debug");
    }
}
