//! HTTP client for the forecast backend.
//!
//! Endpoints:
//! - `GET /api/dashboard` -> `DashboardSnapshot`
//! - `GET /api/forecast[?steps=N]` -> `ForecastOnly`
//! - `GET /health` -> `HealthStatus`

use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::domain::{DashboardSnapshot, ForecastOnly, HealthStatus};
use crate::error::AppError;

const DASHBOARD_PATH: &str = "/api/dashboard";
const FORECAST_PATH: &str = "/api/forecast";
const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: DashboardConfig,
}

impl ApiClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, AppError> {
        // `None` clears reqwest's 30s default: no timeout unless configured.
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetch the full dashboard snapshot.
    pub fn fetch_snapshot(&self) -> Result<DashboardSnapshot, AppError> {
        let snapshot: DashboardSnapshot = self.get_json(DASHBOARD_PATH, &[], "Dashboard")?;
        info!(
            quantity = %snapshot.target,
            history = snapshot.history.len(),
            forecast = snapshot.forecast.len(),
            "fetched dashboard snapshot"
        );
        Ok(snapshot)
    }

    /// Ask the backend for an ad-hoc forecast. `None` uses the backend default horizon.
    pub fn fetch_forecast(&self, steps: Option<u32>) -> Result<ForecastOnly, AppError> {
        let steps_str = steps.map(|s| s.to_string());
        let query: Vec<(&str, &str)> = steps_str
            .as_deref()
            .map(|s| vec![("steps", s)])
            .unwrap_or_default();
        self.get_json(FORECAST_PATH, &query, "Forecast")
    }

    pub fn health(&self) -> Result<HealthStatus, AppError> {
        self.get_json(HEALTH_PATH, &[], "Health")
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T, AppError> {
        let url = self.config.endpoint(path);
        debug!(%url, "GET");

        let mut req = self.client.get(&url);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req
            .send()
            .map_err(|e| AppError::runtime(format!("{what} request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "backend returned an error status");
            return Err(AppError::runtime(format!(
                "{what} request failed with status {status}."
            )));
        }

        resp.json::<T>()
            .map_err(|e| AppError::runtime(format!("Failed to parse {what} response: {e}")))
    }
}

/// Result of one background snapshot fetch, tagged with the id it was issued under.
#[derive(Debug)]
pub struct FetchOutcome {
    pub id: u64,
    pub result: Result<DashboardSnapshot, AppError>,
}

/// Run `fetch_snapshot` on a worker thread and report back over `tx`.
///
/// A closed receiver (the UI already exited) is not an error.
pub fn spawn_fetch(client: ApiClient, id: u64, tx: Sender<FetchOutcome>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = client.fetch_snapshot();
        if let Err(err) = &result {
            warn!(request = id, error = %err, "snapshot fetch failed");
        }
        if tx.send(FetchOutcome { id, result }).is_err() {
            debug!(request = id, "fetch result dropped; receiver gone");
        }
    })
}
