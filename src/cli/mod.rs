//! Command-line parsing for the forecast dashboard client.
//!
//! Argument parsing and command dispatch stay separate from fetching and
//! rendering; `app` turns these structs into a `DashboardConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fdash", version, about = "Terminal dashboard for a time-series forecast backend")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct GlobalArgs {
    /// Backend base address (overrides FORECAST_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds; 0 disables (overrides FORECAST_API_TIMEOUT_SECS).
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write TUI logs to this file (the TUI is otherwise silent).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard (default).
    Tui(TuiArgs),
    /// Print the summary cards, an ASCII chart and the forecast table.
    Show(ShowArgs),
    /// Print the chart spec (labels + Actual/Forecast datasets) as JSON.
    Chart(ChartArgs),
    /// Export the merged series as CSV and optionally the chart spec as JSON.
    Export(ExportArgs),
    /// Query the backend's ad-hoc forecast endpoint.
    Forecast(ForecastArgs),
    /// Check backend health.
    Health,
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    /// Directory for files written with the `e` key.
    #[arg(long, default_value = "exports", value_name = "DIR")]
    pub export_dir: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Skip the ASCII chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Write to this file instead of stdout.
    #[arg(short, long, value_name = "JSON")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Merged series CSV (`date,actual,forecast`).
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Chart spec JSON.
    #[arg(long, value_name = "JSON")]
    pub chart: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    /// Forecast horizon; the backend default is used when omitted.
    #[arg(long)]
    pub steps: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["fdash", "show", "--base-url", "http://h:8000", "-vv", "--no-plot"]);
        assert_eq!(cli.global.base_url.as_deref(), Some("http://h:8000"));
        assert_eq!(cli.global.verbose, 2);
        match cli.command {
            Command::Show(args) => assert!(args.no_plot),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn forecast_steps_are_optional() {
        let cli = Cli::parse_from(["fdash", "forecast", "--steps", "14"]);
        match cli.command {
            Command::Forecast(args) => assert_eq!(args.steps, Some(14)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
