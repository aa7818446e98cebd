//! Export the merged series to CSV and the chart spec to JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets: one row per label,
//! empty cells where a series has no value.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::domain::{ChartSpec, MergedSeries};
use crate::error::AppError;

/// Write `date,actual,forecast` rows.
pub fn write_series_csv(path: &Path, merged: &MergedSeries) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["date", "actual", "forecast"])
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for ((date, actual), forecast) in merged
        .labels
        .iter()
        .zip(merged.actual.iter())
        .zip(merged.forecast.iter())
    {
        let (actual, forecast) = (fmt_cell(*actual), fmt_cell(*forecast));
        writer
            .write_record([date.as_str(), actual.as_str(), forecast.as_str()])
            .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;

    info!(path = %path.display(), rows = merged.len(), "wrote series CSV");
    Ok(())
}

/// Write the chart spec as pretty JSON (`null` for gaps).
pub fn write_chart_json(path: &Path, chart: &ChartSpec) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::config(format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::runtime(format!("Failed to write chart JSON: {e}")))?;
    info!(path = %path.display(), "wrote chart JSON");
    Ok(())
}

/// Timestamped `(csv, json)` paths under `dir`, used by the TUI export key.
pub fn default_export_paths(dir: &Path, target: &str) -> Result<(PathBuf, PathBuf), AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::runtime(format!("Failed to create export dir '{}': {e}", dir.display())))?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let stem: String = target
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    Ok((
        dir.join(format!("fdash_{stem}_{ts}.csv")),
        dir.join(format!("fdash_{stem}_{ts}.json")),
    ))
}

fn fmt_cell(v: Option<f64>) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v}"),
        _ => String::new(),
    }
}
