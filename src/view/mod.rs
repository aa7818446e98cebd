//! Dashboard view state: the fetch lifecycle plus the memoized series derivation.
//!
//! `Loading` is the initial state. A fetch resolves into `Loaded` or `Failed`;
//! `begin_fetch` moves back to `Loading` under a fresh request id, and a
//! response carrying an older id is dropped. The merger only ever sees a
//! complete snapshot held in `Loaded`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{DashboardSnapshot, MergedSeries};
use crate::error::AppError;
use crate::merge::{AlignmentIssue, check_alignment, merge_snapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Loaded(Arc<DashboardSnapshot>),
    Failed(String),
}

/// Derived merged series, keyed on snapshot identity.
#[derive(Debug, Default)]
pub struct SeriesCache {
    key: Option<Arc<DashboardSnapshot>>,
    merged: MergedSeries,
    computations: usize,
}

impl SeriesCache {
    /// Return the merged series for `snapshot`, recomputing only when the
    /// snapshot is not the one the cache was built from.
    pub fn get(&mut self, snapshot: &Arc<DashboardSnapshot>) -> &MergedSeries {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|k| Arc::ptr_eq(k, snapshot));
        if !fresh {
            self.merged = merge_snapshot(snapshot);
            self.key = Some(Arc::clone(snapshot));
            self.computations += 1;
        }
        &self.merged
    }

    /// Number of times the merger actually ran.
    pub fn computations(&self) -> usize {
        self.computations
    }

    fn clear(&mut self) {
        self.key = None;
        self.merged = MergedSeries::default();
    }
}

#[derive(Debug)]
pub struct DashboardView {
    state: ViewState,
    current_request: u64,
    cache: SeriesCache,
    issues: Vec<AlignmentIssue>,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            current_request: 0,
            cache: SeriesCache::default(),
            issues: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Start a new fetch cycle. Returns the id the response must carry.
    pub fn begin_fetch(&mut self) -> u64 {
        self.current_request += 1;
        self.state = ViewState::Loading;
        debug!(request = self.current_request, "view -> Loading");
        self.current_request
    }

    /// Apply a fetch result. Returns `false` when the response is stale and was ignored.
    pub fn resolve(&mut self, id: u64, result: Result<DashboardSnapshot, AppError>) -> bool {
        if id != self.current_request {
            debug!(request = id, current = self.current_request, "stale fetch result ignored");
            return false;
        }

        match result {
            Ok(snapshot) => {
                self.issues = check_alignment(&snapshot.history, &snapshot.forecast);
                for issue in &self.issues {
                    warn!(%issue, "history/forecast alignment");
                }
                info!(request = id, "view -> Loaded");
                self.state = ViewState::Loaded(Arc::new(snapshot));
            }
            Err(err) => {
                info!(request = id, error = %err, "view -> Failed");
                self.issues.clear();
                self.cache.clear();
                self.state = ViewState::Failed(err.to_string());
            }
        }
        true
    }

    pub fn snapshot(&self) -> Option<&Arc<DashboardSnapshot>> {
        match &self.state {
            ViewState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Loaded, but with neither history nor forecast.
    pub fn is_empty_snapshot(&self) -> bool {
        self.snapshot().is_some_and(|s| s.is_empty())
    }

    /// Merged series for the current snapshot; `None` unless there is something to chart.
    pub fn merged(&mut self) -> Option<&MergedSeries> {
        let ViewState::Loaded(snapshot) = &self.state else {
            return None;
        };
        if snapshot.is_empty() {
            return None;
        }
        Some(self.cache.get(snapshot))
    }

    pub fn alignment_issues(&self) -> &[AlignmentIssue] {
        &self.issues
    }

    pub fn merge_count(&self) -> usize {
        self.cache.computations()
    }
}
