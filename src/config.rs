//! Runtime configuration for the dashboard client.
//!
//! The backend address is resolved once in `app` and handed to `ApiClient`
//! explicitly. Nothing below `app` reads the process environment.
//!
//! Precedence: CLI flag, then process environment, then `.env` (loaded by
//! `dotenvy`, which never overrides variables that are already set).

use std::time::Duration;

use crate::error::AppError;

pub const ENV_BASE_URL: &str = "FORECAST_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "FORECAST_API_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend base address, without a trailing `/`.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
}

impl DashboardConfig {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve from CLI overrides and the process environment (after loading `.env`).
    pub fn resolve(cli_base_url: Option<&str>, cli_timeout_secs: Option<u64>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_sources(cli_base_url, cli_timeout_secs, |key| std::env::var(key).ok())
    }

    /// Resolve using an arbitrary variable lookup. Split out for tests.
    pub fn from_sources(
        cli_base_url: Option<&str>,
        cli_timeout_secs: Option<u64>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let base_url = match cli_base_url {
            Some(url) => url.to_string(),
            None => lookup(ENV_BASE_URL).ok_or_else(|| {
                AppError::config(format!(
                    "Missing backend address: pass --base-url or set {ENV_BASE_URL} (environment or .env)."
                ))
            })?,
        };

        let timeout_secs = match cli_timeout_secs {
            Some(secs) => Some(secs),
            None => match lookup(ENV_TIMEOUT_SECS) {
                Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                    AppError::config(format!("Invalid {ENV_TIMEOUT_SECS} '{raw}': {e}"))
                })?),
                None => None,
            },
        };

        Ok(Self::new(&base_url)?.with_timeout(timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)))
    }

    /// Join an endpoint path (leading `/`) onto the base address.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AppError::config("Backend address is empty."));
    }
    let url = reqwest::Url::parse(trimmed)
        .map_err(|e| AppError::config(format!("Invalid backend address '{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::config(format!(
            "Backend address must be http(s), got '{}'.",
            url.scheme()
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_CONFIG;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn cli_flag_wins_over_environment() {
        let cfg = DashboardConfig::from_sources(
            Some("http://cli:8000/"),
            None,
            env(&[(ENV_BASE_URL, "http://env:8000")]),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://cli:8000");
        assert_eq!(cfg.endpoint("/api/dashboard"), "http://cli:8000/api/dashboard");
    }

    #[test]
    fn falls_back_to_environment() {
        let cfg = DashboardConfig::from_sources(
            None,
            None,
            env(&[(ENV_BASE_URL, "https://forecast.example.com"), (ENV_TIMEOUT_SECS, "15")]),
        )
        .unwrap();
        assert_eq!(cfg.base_url, "https://forecast.example.com");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn missing_address_is_a_config_error() {
        let err = DashboardConfig::from_sources(None, None, env(&[])).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
        assert!(err.message().contains(ENV_BASE_URL));
    }

    #[test]
    fn rejects_bad_addresses_and_timeouts() {
        assert!(DashboardConfig::new("ftp://host").is_err());
        assert!(DashboardConfig::new("not a url").is_err());
        assert!(DashboardConfig::new("  ").is_err());
        let err = DashboardConfig::from_sources(
            Some("http://h"),
            None,
            env(&[(ENV_TIMEOUT_SECS, "soon")]),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), EXIT_CONFIG);
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        let cfg = DashboardConfig::from_sources(Some("http://h"), Some(0), env(&[])).unwrap();
        assert_eq!(cfg.timeout, None);
    }
}
