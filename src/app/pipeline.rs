//! Shared fetch -> merge workflow for the non-interactive subcommands.
//!
//! The TUI goes through `view::DashboardView` instead, because it fetches
//! on a worker thread and has to track request ids.

use crate::config::DashboardConfig;
use crate::data::ApiClient;
use crate::domain::{DashboardSnapshot, MergedSeries};
use crate::error::AppError;

/// Outputs of a single fetch.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub snapshot: DashboardSnapshot,
    /// `None` when the snapshot has neither history nor forecast.
    pub merged: Option<MergedSeries>,
}

impl RunOutput {
    pub fn merged_or_empty(&self) -> MergedSeries {
        self.merged.clone().unwrap_or_default()
    }
}

/// Fetch the dashboard snapshot and merge it.
pub fn fetch_and_merge(config: &DashboardConfig) -> Result<RunOutput, AppError> {
    let client = ApiClient::new(config)?;
    let snapshot = client.fetch_snapshot()?;
    Ok(from_snapshot(snapshot))
}

/// Merge an already-fetched snapshot.
pub fn from_snapshot(snapshot: DashboardSnapshot) -> RunOutput {
    let merged = super::merge_with_diagnostics(&snapshot);
    RunOutput { snapshot, merged }
}
