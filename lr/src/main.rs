//! LessonRunner - lesson replay CLI
//!
//! CLI entry point for inspecting the stage catalog and replaying scripted
//! lesson scenarios against the simulated scene.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use lessonrunner::catalog::{self, StageKey};
use lessonrunner::cli::{Cli, Command, OutputFormat};
use lessonrunner::config::Config;
use lessonrunner::scenario::{Replay, Scenario, StepReport};
use lessonrunner::validators::ValidationStatus;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lessonrunner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("lr.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!(%level, "Logging initialized");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log level has to be known before the full config load can log anything
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(?config, "main: config loaded");

    match cli.command {
        Command::Catalog { chapter, format } => cmd_catalog(chapter, format),
        Command::Run {
            scenario,
            realtime,
            format,
        } => cmd_run(&config, &scenario, realtime, format).await,
        Command::ValidateScenario { scenario } => cmd_validate_scenario(&scenario),
    }
}

/// Print the stage catalog
fn cmd_catalog(chapter: Option<u32>, format: OutputFormat) -> Result<()> {
    if let Some(chapter) = chapter
        && catalog::max_stages(chapter).is_none()
    {
        eyre::bail!("Unknown chapter: {}", chapter);
    }

    let keys: Vec<StageKey> = catalog::keys()
        .filter(|k| chapter.is_none_or(|c| k.chapter == c))
        .collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = keys
                .iter()
                .map(|key| serde_json::json!({ "key": key, "stage": catalog::describe(*key) }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            let mut current_chapter = 0;
            for key in keys {
                let descriptor = catalog::describe(key);
                if key.chapter != current_chapter {
                    current_chapter = key.chapter;
                    println!();
                    println!("{}", descriptor.title.bold());
                }
                println!("  {:>4}  {}", key.to_string().as_str().cyan(), descriptor.name);
                println!("        {}", descriptor.description.dimmed());
            }
        }
    }

    Ok(())
}

/// Replay a scenario against a fresh simulated scene
async fn cmd_run(config: &Config, path: &Path, realtime: bool, format: OutputFormat) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let mut replay = Replay::new(config).realtime(realtime);

    if matches!(format, OutputFormat::Text) {
        println!("{} {}", "Scenario:".bold(), scenario.name);
    }

    let reports = replay
        .run(&scenario, |report| {
            if matches!(format, OutputFormat::Text) {
                print_report(report);
            }
        })
        .await?;

    let state = replay.session().state();
    match format {
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "scenario": scenario.name,
                "steps": reports.len(),
                "state": state,
                "reports": reports,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!();
            println!(
                "{} {} steps, now at stage {}{}",
                "Done:".green().bold(),
                reports.len(),
                state.key(),
                if state.stage_complete { " (complete)" } else { "" }
            );
        }
    }

    Ok(())
}

fn print_report(report: &StepReport) {
    let marker = match report.status {
        Some(ValidationStatus::Complete) => "✓".green(),
        Some(ValidationStatus::Incomplete) => "…".yellow(),
        Some(ValidationStatus::Error) => "✗".red(),
        None => "·".normal(),
    };
    println!(
        "{:>3} {} {:<18} {}",
        report.index,
        marker,
        report.action.cyan(),
        report.message
    );
}

/// Parse a scenario without running it
fn cmd_validate_scenario(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    println!(
        "{} {} ({} steps)",
        "Valid scenario:".green(),
        scenario.name,
        scenario.steps.len()
    );
    Ok(())
}
