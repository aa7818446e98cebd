//! Summary cards and the forecast table as plain text.

use crate::domain::{DashboardSnapshot, ForecastOnly, ForecastPoint};

/// One label/value card shown at the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub value: String,
}

/// The four headline cards: target, latest date, latest actual, model.
pub fn summary_cards(snapshot: &DashboardSnapshot) -> Vec<Card> {
    vec![
        Card { title: "Target", value: snapshot.target.clone() },
        Card { title: "Latest Date", value: snapshot.latest.date.clone() },
        Card { title: "Latest Actual", value: fmt_value(snapshot.latest.actual) },
        Card { title: "Model", value: snapshot.model.display_name() },
    ]
}

/// Optional model statistics line (`n_obs`, `aic`, `bic`), when the backend sent any.
pub fn model_stats_line(snapshot: &DashboardSnapshot) -> Option<String> {
    let m = &snapshot.model;
    let mut parts = Vec::new();
    if let Some(n) = m.n_obs {
        parts.push(format!("n_obs={n}"));
    }
    if let Some(aic) = m.aic {
        parts.push(format!("aic={aic:.3}"));
    }
    if let Some(bic) = m.bic {
        parts.push(format!("bic={bic:.3}"));
    }
    if parts.is_empty() { None } else { Some(parts.join(" | ")) }
}

/// Backend refresh metadata, when present.
pub fn refresh_line(snapshot: &DashboardSnapshot) -> Option<String> {
    let meta = snapshot.meta.as_ref()?;
    let mut parts = Vec::new();
    if let Some(ts) = meta.refreshed_at_utc() {
        parts.push(format!("refreshed {}", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(rows) = meta.rows {
        parts.push(format!("rows={rows}"));
    }
    if parts.is_empty() { None } else { Some(parts.join(" | ")) }
}

/// Full text summary: title, cards, optional stats.
pub fn format_summary(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== fdash - {} Forecast Dashboard ({}) ===\n",
        snapshot.target,
        snapshot.model.kind.as_deref().unwrap_or("ARIMA")
    ));
    for card in summary_cards(snapshot) {
        out.push_str(&format!("{:<14} {}\n", format!("{}:", card.title), card.value));
    }
    if let Some(stats) = model_stats_line(snapshot) {
        out.push_str(&format!("{:<14} {stats}\n", "Fit:"));
    }
    if let Some(refresh) = refresh_line(snapshot) {
        out.push_str(&format!("{:<14} {refresh}\n", "Backend:"));
    }
    out
}

/// `Forecast (next N days)` table with a right-aligned prediction column.
pub fn format_forecast_table(forecast: &[ForecastPoint]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Forecast (next {} days):\n", forecast.len()));
    out.push_str(&format!("{:<12} {:>14}\n", "Date", "Pred"));
    out.push_str(&format!("{:-<12} {:-<14}\n", "", ""));
    for row in forecast {
        out.push_str(&format!("{:<12} {:>14}\n", truncate(&row.date, 12), fmt_value(row.pred)));
    }
    out
}

/// Output of `fdash forecast`.
pub fn format_forecast_only(resp: &ForecastOnly) -> String {
    let mut out = format!("steps={}\n", resp.steps);
    for (i, v) in resp.pred.iter().enumerate() {
        out.push_str(&format!("{:>4} {:>14}\n", i + 1, fmt_value(*v)));
    }
    out
}

pub fn fmt_value(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.2}")
    } else {
        "-".to_string()
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HistoryPoint, LatestPoint, ModelInfo, SnapshotMeta};

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            target: "Gold_High".to_string(),
            latest: LatestPoint { date: "2024-01-02".to_string(), actual: 2010.0 },
            model: ModelInfo { order: [2, 1, 0], kind: Some("ARIMA".to_string()), n_obs: Some(180), aic: Some(1234.5), bic: None },
            history: vec![HistoryPoint { date: "2024-01-02".to_string(), actual: 2010.0 }],
            forecast: vec![
                ForecastPoint { date: "2024-01-03".to_string(), pred: 2020.126 },
                ForecastPoint { date: "2024-01-04".to_string(), pred: f64::NAN },
            ],
            meta: Some(SnapshotMeta { refreshed_at: Some(0), rows: None }),
        }
    }

    #[test]
    fn cards_match_dashboard_headline() {
        let cards = summary_cards(&snapshot());
        let values: Vec<_> = cards.iter().map(|c| (c.title, c.value.as_str())).collect();
        assert_eq!(
            values,
            vec![
                ("Target", "Gold_High"),
                ("Latest Date", "2024-01-02"),
                ("Latest Actual", "2010.00"),
                ("Model", "ARIMA(2,1,0)"),
            ]
        );
    }

    #[test]
    fn summary_includes_optional_lines() {
        let text = format_summary(&snapshot());
        assert!(text.contains("Model:         ARIMA(2,1,0)"));
        assert!(text.contains("n_obs=180 | aic=1234.500"));
        assert!(text.contains("refreshed 1970-01-01 00:00:00 UTC"));
    }

    #[test]
    fn forecast_table_lists_every_row() {
        let table = format_forecast_table(&snapshot().forecast);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Forecast (next 2 days):");
        assert_eq!(lines[3], "2024-01-03          2020.13");
        assert!(lines[4].ends_with('-'));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn stats_line_absent_without_stats() {
        let mut snap = snapshot();
        snap.model.n_obs = None;
        snap.model.aic = None;
        assert_eq!(model_stats_line(&snap), None);
    }
}
