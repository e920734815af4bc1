use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod aggregate;
mod config;
mod error;
mod format;
mod interviews;
mod loader;
mod metrics;
mod models;
mod report;
mod roe;
mod table;

use aggregate::Dimension;
use config::InsightsConfig;
use loader::Source;

#[derive(Parser)]
#[command(name = "tracker-insights")]
#[command(about = "Descriptive statistics for a job application tracker workbook", long_about = None)]
struct Cli {
    /// Workbook (.xlsx/.xls) or directory of tracker/interviews/roe CSV files
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Configuration file (defaults to tracker-insights.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown, global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare each sheet's columns against the required set
    Validate,
    /// Response rates, response times and traction
    Summary,
    /// Applications grouped by one tracker column
    Breakdown {
        #[arg(long, value_enum)]
        by: Dimension,
    },
    /// Applications per status
    Status,
    /// Interview metrics, tables and heatmap
    Interviews,
    /// Return-on-effort points and chance-of-success accuracy
    Roe {
        /// Only include these application statuses (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,
    },
    /// Write the full Markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = InsightsConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    let source = Source::resolve(cli.source.as_deref(), &config);
    let workbook = source
        .read(&config)
        .with_context(|| format!("failed to read {source:?}"))?;

    if let Commands::Validate = cli.command {
        let reports = workbook.validate(&config);
        if reports.iter().all(|r| r.is_valid()) {
            tracing::info!("all sheets have the required columns");
        }
        match cli.format {
            OutputFormat::Json => print_json(&reports)?,
            OutputFormat::Markdown => print!("{}", report::render_validation(&reports)),
        }
        return Ok(());
    }

    let dataset = workbook
        .into_dataset(&config)
        .context("failed to load tracker data; run `validate` to check the sheet columns")?;

    match cli.command {
        Commands::Validate => {}
        Commands::Summary => {
            let summary = metrics::ApplicationSummary::compute(&dataset.applications, &config)?;
            match cli.format {
                OutputFormat::Json => print_json(&summary)?,
                OutputFormat::Markdown => print!("{}", report::render_summary(&summary)),
            }
        }
        Commands::Breakdown { by } => match cli.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "color": config.display.chart_color(by),
                "table": aggregate::breakdown(&dataset.applications, by, &config.taxonomy)?,
            }))?,
            OutputFormat::Markdown => print!("{}", report::render_breakdown(&dataset, by, &config)?),
        },
        Commands::Status => {
            let table = aggregate::status_counts(&dataset.applications)?;
            match cli.format {
                OutputFormat::Json => print_json(&table)?,
                OutputFormat::Markdown => print!("{}", table.to_markdown()),
            }
        }
        Commands::Interviews => {
            let summary =
                interviews::InterviewSummary::compute(&dataset.applications, &dataset.interviews, &config);
            let tables = interviews::InterviewTables::compute(&dataset.interviews)?;
            match cli.format {
                OutputFormat::Json => {
                    let heatmap =
                        interviews::heatmap(&dataset.interviews, &config.analysis.interview_date_format)?;
                    print_json(&serde_json::json!({
                        "summary": summary,
                        "tables": tables,
                        "heatmap": heatmap,
                    }))?
                }
                OutputFormat::Markdown => {
                    print!("{}", report::render_interview_summary(&summary));
                    println!();
                    print!("{}", report::render_interview_tables(&tables));
                }
            }
        }
        Commands::Roe { statuses } => {
            let points = roe::points(&dataset.roe, &statuses);
            let accuracy = roe::ChanceAccuracy::compute(&dataset.roe, &dataset.applications, &config)?;
            match cli.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "statuses": roe::unique_statuses(&dataset.roe),
                    "accuracy": accuracy,
                    "points": points,
                }))?,
                OutputFormat::Markdown => {
                    print!("{}", report::render_accuracy(&accuracy, accuracy.real_response_rate));
                    println!();
                    println!("| # | Company | Status | Chance | Effort | ROE |");
                    println!("| --- | --- | --- | --- | --- | --- |");
                    for point in &points {
                        println!(
                            "| {} | {} | {} | {}{} | {} | {} |",
                            point.application_number,
                            point.company_name.as_deref().unwrap_or(""),
                            point.application_status.as_deref().unwrap_or(""),
                            table::Cell::from(point.chance_of_success),
                            if point.no_salary_listed { " (no salary)" } else { "" },
                            table::Cell::from(point.application_effort),
                            table::Cell::from(point.roe),
                        );
                    }
                }
            }
        }
        Commands::Report { out } => {
            let report = report::build_report(&dataset, &config);
            std::fs::write(&out, report)?;
            tracing::info!("report written to {}", out.display());
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
