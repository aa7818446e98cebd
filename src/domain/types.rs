//! Shared domain types.
//!
//! Snapshot types mirror the backend JSON exactly so they can be decoded with
//! `serde_json` and re-emitted for debugging. Dates are kept as the strings the
//! backend sent: they are axis labels, not values we compute with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One complete `/api/dashboard` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Identifier of the forecasted quantity (e.g. `Gold_High`).
    pub target: String,
    pub latest: LatestPoint,
    pub model: ModelInfo,
    pub history: Vec<HistoryPoint>,
    pub forecast: Vec<ForecastPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SnapshotMeta>,
}

impl DashboardSnapshot {
    /// True when there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty() && self.forecast.is_empty()
    }
}

/// Most recent observed data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestPoint {
    pub date: String,
    pub actual: f64,
}

/// Descriptive model metadata. Only `order` is required; the rest is shown when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub order: [i64; 3],
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_obs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aic: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<f64>,
}

impl ModelInfo {
    /// `ARIMA(2,1,0)`-style label. Falls back to `ARIMA` when the backend omits `type`.
    pub fn display_name(&self) -> String {
        let [p, d, q] = self.order;
        let kind = self.kind.as_deref().unwrap_or("ARIMA");
        format!("{kind}({p},{d},{q})")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: String,
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: String,
    pub pred: f64,
}

/// Backend bookkeeping. Unknown keys (paths, etc.) are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// UNIX seconds of the backend's last refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u64>,
}

impl SnapshotMeta {
    pub fn refreshed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// Response of `/api/forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOnly {
    pub steps: u32,
    pub pred: Vec<f64>,
}

/// Response of `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// History and forecast aligned on one label axis.
///
/// `actual` and `forecast` have the same length as `labels`; `None` marks a
/// position with no value. At most one of the two is `Some` at any index.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MergedSeries {
    pub labels: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub forecast: Vec<Option<f64>>,
}

/// Dataset labels used by the chart spec and the renderers.
pub const ACTUAL_LABEL: &str = "Actual";
pub const FORECAST_LABEL: &str = "Forecast";

/// Chart description consumed by a rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<Option<f64>>,
}
