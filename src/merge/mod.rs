//! Series merging: history + forecast -> one label axis, two padded series.
//!
//! Everything here is pure. The renderers (TUI chart, ASCII plot, exports)
//! all consume the same `MergedSeries`, so the alignment rules live in one place.

use crate::domain::{
    ACTUAL_LABEL, ChartDataset, ChartSpec, DashboardSnapshot, FORECAST_LABEL, ForecastPoint,
    HistoryPoint, MergedSeries,
};

pub mod alignment;

pub use alignment::{AlignmentIssue, check_alignment};

/// Merge history and forecast onto a shared axis.
///
/// Labels are history dates followed by forecast dates, in input order. No
/// sorting and no deduplication; values pass through untouched.
pub fn merge_series(history: &[HistoryPoint], forecast: &[ForecastPoint]) -> MergedSeries {
    let len = history.len() + forecast.len();

    let mut labels = Vec::with_capacity(len);
    labels.extend(history.iter().map(|h| h.date.clone()));
    labels.extend(forecast.iter().map(|f| f.date.clone()));

    let mut actual = Vec::with_capacity(len);
    actual.extend(history.iter().map(|h| Some(h.actual)));
    actual.resize(len, None);

    let mut predicted = vec![None; history.len()];
    predicted.reserve(forecast.len());
    predicted.extend(forecast.iter().map(|f| Some(f.pred)));

    MergedSeries {
        labels,
        actual,
        forecast: predicted,
    }
}

/// Convenience wrapper over `merge_series` for a whole snapshot.
pub fn merge_snapshot(snapshot: &DashboardSnapshot) -> MergedSeries {
    merge_series(&snapshot.history, &snapshot.forecast)
}

impl MergedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the first forecast position (equals the history length).
    pub fn boundary(&self) -> usize {
        self.forecast
            .iter()
            .position(Option::is_some)
            .unwrap_or_else(|| self.actual.iter().filter(|v| v.is_some()).count())
    }

    /// Build the two-dataset chart description (`Actual`, `Forecast`).
    pub fn to_chart_spec(&self) -> ChartSpec {
        ChartSpec {
            labels: self.labels.clone(),
            datasets: vec![
                ChartDataset {
                    label: ACTUAL_LABEL.to_string(),
                    data: self.actual.clone(),
                },
                ChartDataset {
                    label: FORECAST_LABEL.to_string(),
                    data: self.forecast.clone(),
                },
            ],
        }
    }

    /// Min/max over every present value in both series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in self.actual.iter().chain(self.forecast.iter()).flatten() {
            if v.is_finite() {
                lo = lo.min(*v);
                hi = hi.max(*v);
            }
        }
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }
}
