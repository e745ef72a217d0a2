//! Kaizen Effectiveness Analyzer - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use kaizen_analyzer::{
    cli::{Args, Commands, Config},
    display::TerminalDisplay,
    loader::InputLoader,
    logging,
    monitor::Monitor,
    report::render_report,
    EffectivenessAnalyzer,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.apply_args(&args).context("Invalid configuration")?;

    logging::init(config.verbosity());
    if !config.display.color_output {
        colored::control::set_override(false);
    }

    let analyzer = EffectivenessAnalyzer::new(
        InputLoader::new(config.input_paths(), config.input.on_malformed),
        config.analyzer_config(),
    );

    match args.command() {
        Commands::Watch => run_watch(&config, analyzer).await?,
        Commands::Report { json } => run_report(analyzer, json)?,
        Commands::Chart => run_chart(&config, analyzer)?,
        Commands::Config { save } => show_config(&config, args.config.as_deref(), save)?,
    }

    Ok(())
}

/// Re-render the report until Ctrl+C
async fn run_watch(config: &Config, analyzer: EffectivenessAnalyzer) -> Result<()> {
    let charts = if config.schedule.charts_enabled {
        Some(config.chart_renderer().context("Failed to set up chart rendering")?)
    } else {
        None
    };

    let mut display = TerminalDisplay::stdout(config.display.clear_screen);
    display.show_banner(env!("CARGO_PKG_VERSION"))?;

    let mut monitor = Monitor::new(analyzer, charts, display, config.schedule());
    monitor.run(shutdown_signal()).await?;
    Ok(())
}

/// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Print a single report
fn run_report(analyzer: EffectivenessAnalyzer, json: bool) -> Result<()> {
    let report = analyzer.generate_report().context("Failed to build report")?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", render_report(&report));
    }
    Ok(())
}

/// Render the chart once
fn run_chart(config: &Config, analyzer: EffectivenessAnalyzer) -> Result<()> {
    let renderer = config
        .chart_renderer()
        .context("Failed to set up chart rendering")?;
    let snapshot = analyzer.snapshot().context("Failed to load inputs")?;

    if renderer.render_snapshot(&snapshot)? {
        println!("{} Analysis plots saved to {}", "📊".cyan(), renderer.output().display());
    } else {
        println!("{} No improvement history yet; chart skipped", "Info:".cyan());
    }
    Ok(())
}

/// Display effective configuration, optionally writing it to disk
fn show_config(config: &Config, target: Option<&Path>, save: bool) -> Result<()> {
    println!("\n{}", "Kaizen Analyzer Configuration".bold().cyan());
    println!("{}", "─".repeat(37).cyan());
    if let Some(path) = Config::default_path() {
        println!("{} {}\n", "Default file:".dimmed(), path.display());
    }
    println!("{}", config.to_toml()?);

    if save {
        let path = target
            .map(Path::to_path_buf)
            .or_else(Config::default_path)
            .context("No home directory for the default config file")?;
        config.save(&path)?;
        println!("{} Configuration saved to {}", "✓".green(), path.display());
    }
    Ok(())
}
