//! Diagnostics for history/forecast date alignment.
//!
//! The merger never reorders or deduplicates. When the backend hands us
//! overlapping or out-of-order dates we only report it, so the operator can
//! tell why the chart looks odd.
//!
//! Comparison is lexicographic, which matches chronological order for ISO
//! `YYYY-MM-DD` labels.

use std::collections::HashSet;
use std::fmt;

use crate::domain::{ForecastPoint, HistoryPoint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentIssue {
    /// The same label appears more than once on the merged axis.
    DuplicateLabel(String),
    /// A date goes backwards within history.
    HistoryOutOfOrder { index: usize, date: String },
    /// A date goes backwards within the forecast.
    ForecastOutOfOrder { index: usize, date: String },
    /// The forecast starts before history ends.
    ForecastStartsBeforeHistoryEnd { history_end: String, forecast_start: String },
}

impl fmt::Display for AlignmentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLabel(date) => write!(f, "duplicate label {date}"),
            Self::HistoryOutOfOrder { index, date } => {
                write!(f, "history out of order at #{index} ({date})")
            }
            Self::ForecastOutOfOrder { index, date } => {
                write!(f, "forecast out of order at #{index} ({date})")
            }
            Self::ForecastStartsBeforeHistoryEnd { history_end, forecast_start } => write!(
                f,
                "forecast starts {forecast_start}, before history end {history_end}"
            ),
        }
    }
}

/// Report duplicate or out-of-order dates. An empty result means the axis is clean.
pub fn check_alignment(history: &[HistoryPoint], forecast: &[ForecastPoint]) -> Vec<AlignmentIssue> {
    let mut issues = Vec::new();

    for (i, pair) in history.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            issues.push(AlignmentIssue::HistoryOutOfOrder {
                index: i + 1,
                date: pair[1].date.clone(),
            });
        }
    }
    for (i, pair) in forecast.windows(2).enumerate() {
        if pair[1].date < pair[0].date {
            issues.push(AlignmentIssue::ForecastOutOfOrder {
                index: i + 1,
                date: pair[1].date.clone(),
            });
        }
    }

    if let (Some(last), Some(first)) = (history.last(), forecast.first()) {
        if first.date < last.date {
            issues.push(AlignmentIssue::ForecastStartsBeforeHistoryEnd {
                history_end: last.date.clone(),
                forecast_start: first.date.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let dates = history
        .iter()
        .map(|h| h.date.as_str())
        .chain(forecast.iter().map(|f| f.date.as_str()));
    for date in dates {
        if !seen.insert(date) && reported.insert(date) {
            issues.push(AlignmentIssue::DuplicateLabel(date.to_string()));
        }
    }

    issues
}
