//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the backend configuration
//! - sets up logging
//! - dispatches to the TUI or one of the print/export subcommands

use clap::Parser;
use tracing::{info, warn};

use crate::cli::{ChartArgs, Cli, Command, ExportArgs, ForecastArgs, ShowArgs, TuiArgs};
use crate::config::DashboardConfig;
use crate::data::ApiClient;
use crate::domain::{DashboardSnapshot, MergedSeries};
use crate::error::AppError;
use crate::logging::LogSink;
use crate::merge::{check_alignment, merge_snapshot};

pub mod pipeline;

/// Entry point for the `fdash` binary.
pub fn run() -> Result<(), AppError> {
    // `fdash` and `fdash --base-url X` behave like `fdash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let sink = match (&cli.command, &cli.global.log_file) {
        (Command::Tui(_), Some(path)) => LogSink::File(path),
        (Command::Tui(_), None) => LogSink::Off,
        _ => LogSink::Stderr,
    };
    crate::logging::init(sink, cli.global.verbose)?;

    let config = DashboardConfig::resolve(cli.global.base_url.as_deref(), cli.global.timeout_secs)?;
    info!(base_url = %config.base_url, timeout = ?config.timeout, "resolved configuration");

    match cli.command {
        Command::Tui(args) => handle_tui(&config, args),
        Command::Show(args) => handle_show(&config, args),
        Command::Chart(args) => handle_chart(&config, args),
        Command::Export(args) => handle_export(&config, args),
        Command::Forecast(args) => handle_forecast(&config, args),
        Command::Health => handle_health(&config),
    }
}

fn handle_tui(config: &DashboardConfig, args: TuiArgs) -> Result<(), AppError> {
    crate::tui::run(config, args.export_dir)
}

fn handle_show(config: &DashboardConfig, args: ShowArgs) -> Result<(), AppError> {
    let run = pipeline::fetch_and_merge(config)?;

    println!("{}", crate::report::format_summary(&run.snapshot));

    match &run.merged {
        None => println!("No data to display."),
        Some(merged) if !args.no_plot => {
            println!("{}", crate::plot::render_ascii_plot(merged, args.width, args.height));
        }
        Some(_) => {}
    }

    println!("{}", crate::report::format_forecast_table(&run.snapshot.forecast));
    Ok(())
}

fn handle_chart(config: &DashboardConfig, args: ChartArgs) -> Result<(), AppError> {
    let run = pipeline::fetch_and_merge(config)?;
    let chart = run.merged_or_empty().to_chart_spec();

    match &args.output {
        Some(path) => crate::io::write_chart_json(path, &chart)?,
        None => {
            let json = serde_json::to_string_pretty(&chart)
                .map_err(|e| AppError::runtime(format!("Failed to encode chart JSON: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}

fn handle_export(config: &DashboardConfig, args: ExportArgs) -> Result<(), AppError> {
    let run = pipeline::fetch_and_merge(config)?;
    let merged = run.merged_or_empty();

    crate::io::write_series_csv(&args.csv, &merged)?;
    if let Some(path) = &args.chart {
        crate::io::write_chart_json(path, &merged.to_chart_spec())?;
    }
    println!("Wrote {} rows to {}", merged.len(), args.csv.display());
    Ok(())
}

fn handle_forecast(config: &DashboardConfig, args: ForecastArgs) -> Result<(), AppError> {
    let client = ApiClient::new(config)?;
    let resp = client.fetch_forecast(args.steps)?;
    print!("{}", crate::report::format_forecast_only(&resp));
    Ok(())
}

fn handle_health(config: &DashboardConfig) -> Result<(), AppError> {
    let client = ApiClient::new(config)?;
    let health = client.health()?;
    println!("{}: {}", client.base_url(), health.status);
    Ok(())
}

/// Merge a snapshot for the non-interactive paths, logging any alignment issues.
pub(crate) fn merge_with_diagnostics(snapshot: &DashboardSnapshot) -> Option<MergedSeries> {
    for issue in check_alignment(&snapshot.history, &snapshot.forecast) {
        warn!(%issue, "history/forecast alignment");
    }
    if snapshot.is_empty() {
        return None;
    }
    Some(merge_snapshot(snapshot))
}

/// Rewrite argv so `fdash` defaults to `fdash tui`.
///
/// Rules:
/// - `fdash`                       -> `fdash tui`
/// - `fdash --base-url X ...`      -> `fdash tui --base-url X ...`
/// - `fdash --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "show" | "chart" | "export" | "forecast" | "health"
    );
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
