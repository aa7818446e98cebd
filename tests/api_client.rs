mod common;

use std::sync::mpsc;
use std::time::Duration;

use forecast_dash::config::DashboardConfig;
use forecast_dash::data::{ApiClient, spawn_fetch};
use forecast_dash::error::EXIT_RUNTIME;
use forecast_dash::view::{DashboardView, ViewState};

use common::{DASHBOARD_JSON, serve, serve_delayed};

fn client(base_url: &str) -> ApiClient {
    let config = DashboardConfig::new(base_url)
        .unwrap()
        .with_timeout(Some(Duration::from_secs(5)));
    ApiClient::new(&config).unwrap()
}

#[test]
fn fetches_dashboard_snapshot() {
    let stub = serve(vec![("200 OK", DASHBOARD_JSON.to_string())]);
    let snapshot = client(&stub.base_url).fetch_snapshot().unwrap();

    assert_eq!(snapshot.target, "Gold_High");
    assert_eq!(snapshot.history.len(), 2);
    assert_eq!(snapshot.forecast[0].pred, 2020.0);
    assert_eq!(stub.requests.recv().unwrap(), "GET /api/dashboard HTTP/1.1");
}

#[test]
fn trailing_slash_on_base_url_is_tolerated() {
    let stub = serve(vec![("200 OK", DASHBOARD_JSON.to_string())]);
    client(&format!("{}/", stub.base_url)).fetch_snapshot().unwrap();
    assert_eq!(stub.requests.recv().unwrap(), "GET /api/dashboard HTTP/1.1");
}

#[test]
fn error_status_is_a_runtime_error() {
    let stub = serve(vec![("500 Internal Server Error", r#"{"detail":"boom"}"#.to_string())]);
    let err = client(&stub.base_url).fetch_snapshot().unwrap_err();

    assert_eq!(err.exit_code(), EXIT_RUNTIME);
    assert!(err.message().contains("status 500"), "{err}");
}

#[test]
fn malformed_json_is_a_runtime_error() {
    let stub = serve(vec![("200 OK", r#"{"target": "x"}"#.to_string())]);
    let err = client(&stub.base_url).fetch_snapshot().unwrap_err();

    assert_eq!(err.exit_code(), EXIT_RUNTIME);
    assert!(err.message().starts_with("Failed to parse Dashboard response"), "{err}");
}

#[test]
fn connection_refused_is_reported() {
    // Bind then drop to get a port nobody is listening on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let err = client(&format!("http://{addr}")).fetch_snapshot().unwrap_err();
    assert!(err.message().starts_with("Dashboard request failed"), "{err}");
}

#[test]
fn forecast_and_health_endpoints() {
    let stub = serve(vec![
        ("200 OK", r#"{"steps": 3, "pred": [1.0, 2.0, 3.0]}"#.to_string()),
        ("200 OK", r#"{"status": "ok"}"#.to_string()),
        ("200 OK", r#"{"steps": 7, "pred": []}"#.to_string()),
    ]);
    let api = client(&stub.base_url);

    let fc = api.fetch_forecast(Some(3)).unwrap();
    assert_eq!(fc.steps, 3);
    assert_eq!(fc.pred, vec![1.0, 2.0, 3.0]);
    assert_eq!(stub.requests.recv().unwrap(), "GET /api/forecast?steps=3 HTTP/1.1");

    assert_eq!(api.health().unwrap().status, "ok");
    assert_eq!(stub.requests.recv().unwrap(), "GET /health HTTP/1.1");

    api.fetch_forecast(None).unwrap();
    assert_eq!(stub.requests.recv().unwrap(), "GET /api/forecast HTTP/1.1");
}

#[test]
fn background_fetch_drives_the_view() {
    let stub = serve(vec![("200 OK", DASHBOARD_JSON.to_string())]);
    let api = client(&stub.base_url);

    let mut view = DashboardView::new();
    let (tx, rx) = mpsc::channel();
    let id = view.begin_fetch();
    spawn_fetch(api, id, tx).join().unwrap();

    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(view.resolve(outcome.id, outcome.result));
    assert!(matches!(view.state(), ViewState::Loaded(_)));

    let merged = view.merged().unwrap();
    assert_eq!(merged.labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(merged.actual, vec![Some(2000.0), Some(2010.0), None]);
    assert_eq!(merged.forecast, vec![None, None, Some(2020.0)]);
}

#[test]
fn rejected_background_fetch_fails_the_view() {
    let stub = serve(vec![("503 Service Unavailable", String::new())]);
    let api = client(&stub.base_url);

    let mut view = DashboardView::new();
    let (tx, rx) = mpsc::channel();
    let id = view.begin_fetch();
    spawn_fetch(api, id, tx).join().unwrap();

    let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    view.resolve(outcome.id, outcome.result);

    match view.state() {
        ViewState::Failed(msg) => assert!(msg.contains("503"), "{msg}"),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(view.merged().is_none());
    assert_eq!(view.merge_count(), 0);
}

// Slow: the stub answers after reqwest's 30s default timeout would have fired.
#[test]
fn unconfigured_timeout_waits_for_a_slow_backend() {
    let stub = serve_delayed(Duration::from_secs(32), vec![("200 OK", DASHBOARD_JSON.to_string())]);
    let config = DashboardConfig::from_sources(Some(&stub.base_url), Some(0), |_| None).unwrap();
    assert_eq!(config.timeout, None);

    let snapshot = ApiClient::new(&config).unwrap().fetch_snapshot().unwrap();
    assert_eq!(snapshot.target, "Gold_High");
}

#[test]
fn configured_timeout_cuts_off_a_slow_backend() {
    let stub = serve_delayed(Duration::from_secs(3), vec![("200 OK", DASHBOARD_JSON.to_string())]);
    let config = DashboardConfig::new(&stub.base_url)
        .unwrap()
        .with_timeout(Some(Duration::from_millis(300)));

    let err = ApiClient::new(&config).unwrap().fetch_snapshot().unwrap_err();
    assert_eq!(err.exit_code(), EXIT_RUNTIME);
    assert!(err.message().starts_with("Dashboard request failed"), "{err}");
}
