//! Ratatui-based terminal dashboard.
//!
//! Layout: headline cards on top, the actual-vs-forecast chart with the
//! forecast table beside it, and a footer with key help and status. The
//! snapshot is fetched on a worker thread so the event loop keeps drawing
//! `Loading...` while the request is in flight.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};
use tracing::info;

use crate::config::DashboardConfig;
use crate::data::{ApiClient, FetchOutcome, spawn_fetch};
use crate::domain::MergedSeries;
use crate::error::AppError;
use crate::report::{fmt_value, model_stats_line, summary_cards};
use crate::view::{DashboardView, ViewState};

mod plotters_chart;

use plotters_chart::ForecastPlottersChart;

/// Start the TUI against the configured backend.
pub fn run(config: &DashboardConfig, export_dir: PathBuf) -> Result<(), AppError> {
    let client = ApiClient::new(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client, export_dir);
    app.refetch();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    client: ApiClient,
    view: DashboardView,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    table_offset: usize,
    status: String,
    export_dir: PathBuf,
}

impl App {
    fn new(client: ApiClient, export_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            view: DashboardView::new(),
            tx,
            rx,
            table_offset: 0,
            status: String::new(),
            export_dir,
        }
    }

    fn refetch(&mut self) {
        let id = self.view.begin_fetch();
        self.status = format!("Fetching {} ...", self.client.base_url());
        spawn_fetch(self.client.clone(), id, self.tx.clone());
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_fetches() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply any finished fetches. Returns true when the view changed.
    fn drain_fetches(&mut self) -> bool {
        let mut changed = false;
        loop {
            match self.rx.try_recv() {
                Ok(outcome) => {
                    if self.view.resolve(outcome.id, outcome.result) {
                        changed = true;
                        self.table_offset = 0;
                        self.status = self.status_after_fetch();
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    fn status_after_fetch(&self) -> String {
        let now = Local::now().format("%H:%M:%S");
        match self.view.state() {
            ViewState::Loaded(snapshot) => {
                let issues = self.view.alignment_issues();
                match issues.first() {
                    None => format!("Loaded {} at {now}", snapshot.target),
                    Some(first) => format!(
                        "Loaded {} at {now}; {} alignment issue(s): {first}",
                        snapshot.target,
                        issues.len()
                    ),
                }
            }
            ViewState::Failed(_) => format!("Fetch failed at {now} (r to retry)"),
            ViewState::Loading => "Fetching...".to_string(),
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('r') => self.refetch(),
            KeyCode::Up => {
                self.table_offset = self.table_offset.saturating_sub(1);
            }
            KeyCode::Down => {
                let rows = self.view.snapshot().map(|s| s.forecast.len()).unwrap_or(0);
                if self.table_offset + 1 < rows {
                    self.table_offset += 1;
                }
            }
            KeyCode::Char('e') => self.export(),
            _ => {}
        }
        false
    }

    fn export(&mut self) {
        let Some(target) = self.view.snapshot().map(|s| s.target.clone()) else {
            self.status = "Nothing to export yet.".to_string();
            return;
        };
        let Some(merged) = self.view.merged().cloned() else {
            self.status = "No data to export.".to_string();
            return;
        };

        let result = crate::io::default_export_paths(&self.export_dir, &target).and_then(|(csv, json)| {
            crate::io::write_series_csv(&csv, &merged)?;
            crate::io::write_chart_json(&json, &merged.to_chart_spec())?;
            Ok(csv)
        });
        self.status = match result {
            Ok(path) => {
                info!(path = %path.display(), "exported from TUI");
                format!("Exported {}", path.display())
            }
            Err(err) => format!("Export failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let outer = Block::default()
            .title(Line::from(vec![
                Span::styled("fdash", Style::default().fg(Color::Cyan)),
                Span::raw(" forecast dashboard"),
            ]))
            .borders(Borders::ALL);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let Some(snapshot) = self.view.snapshot() else {
            let msg = match self.view.state() {
                ViewState::Failed(_) => "-",
                _ => "Loading...",
            };
            frame.render_widget(Paragraph::new(msg).style(Style::default().fg(Color::Gray)), inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let cards = summary_cards(snapshot);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
            .split(rows[0]);
        for (card, rect) in cards.iter().zip(cols.iter()) {
            let text = vec![
                Line::from(Span::styled(card.title, Style::default().add_modifier(Modifier::BOLD))),
                Line::from(card.value.clone()),
            ];
            frame.render_widget(Paragraph::new(text), *rect);
        }

        if let Some(stats) = model_stats_line(snapshot) {
            frame.render_widget(
                Paragraph::new(stats).style(Style::default().fg(Color::Gray)),
                rows[1],
            );
        }
    }

    fn draw_body(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(32)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
    }

    fn draw_chart(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Actual vs Forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let placeholder = match self.view.state() {
            ViewState::Loading => Some(("Loading...".to_string(), Color::Yellow)),
            ViewState::Failed(msg) => Some((format!("Error: {msg}"), Color::Red)),
            ViewState::Loaded(_) if self.view.is_empty_snapshot() => {
                Some(("No data to display.".to_string(), Color::Gray))
            }
            ViewState::Loaded(_) => None,
        };
        if let Some((msg, color)) = placeholder {
            let p = Paragraph::new(msg)
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true });
            frame.render_widget(p, inner);
            return;
        }

        let Some(snapshot) = self.view.snapshot().cloned() else {
            return;
        };
        let Some(merged) = self.view.merged() else {
            return;
        };

        let data = chart_series(merged);
        let widget = ForecastPlottersChart {
            actual: &data.actual,
            forecast: &data.forecast,
            boundary: data.boundary,
            labels: &merged.labels,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            y_label: &snapshot.target,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let forecast = self
            .view
            .snapshot()
            .map(|s| s.forecast.as_slice())
            .unwrap_or(&[]);

        let header = Row::new(vec![
            Cell::from("Date"),
            Cell::from(Line::from("Pred").alignment(Alignment::Right)),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = forecast.iter().skip(self.table_offset).map(|row| {
            Row::new(vec![
                Cell::from(row.date.clone()),
                Cell::from(Line::from(fmt_value(row.pred)).alignment(Alignment::Right)),
            ])
        });

        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(10)])
            .header(header)
            .block(
                Block::default()
                    .title(format!("Forecast (next {} days)", forecast.len()))
                    .borders(Borders::ALL),
            );
        frame.render_widget(table, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "r refetch  ↑/↓ scroll table  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Prepared chart geometry for the Plotters widget.
#[derive(Debug, Clone, PartialEq)]
struct ChartData {
    actual: Vec<Vec<(f64, f64)>>,
    forecast: Vec<Vec<(f64, f64)>>,
    boundary: Option<f64>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn chart_series(merged: &MergedSeries) -> ChartData {
    let x_max = (merged.len().saturating_sub(1)).max(1) as f64;
    let x_bounds = [0.0, x_max];

    let (mut y_min, mut y_max) = merged.value_range().unwrap_or((0.0, 1.0));
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    let boundary = merged.boundary();
    let boundary = (boundary > 0 && boundary < merged.len()).then(|| boundary as f64 - 0.5);

    ChartData {
        actual: segments(&merged.actual),
        forecast: segments(&merged.forecast),
        boundary,
        x_bounds,
        y_bounds,
    }
}

/// Split a padded series into runs of present, finite values.
fn segments(series: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, v) in series.iter().enumerate() {
        match v {
            Some(y) if y.is_finite() => current.push((i as f64, *y)),
            _ => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastPoint, HistoryPoint};
    use crate::merge::merge_series;

    #[test]
    fn gaps_split_segments() {
        let segs = segments(&[Some(1.0), Some(2.0), None, Some(f64::NAN), Some(3.0)]);
        assert_eq!(segs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 3.0)]]);
        assert!(segments(&[None, None]).is_empty());
    }

    #[test]
    fn chart_series_partitions_axis() {
        let merged = merge_series(
            &[
                HistoryPoint { date: "2024-01-01".to_string(), actual: 2000.0 },
                HistoryPoint { date: "2024-01-02".to_string(), actual: 2010.0 },
            ],
            &[ForecastPoint { date: "2024-01-03".to_string(), pred: 2020.0 }],
        );
        let data = chart_series(&merged);
        assert_eq!(data.actual, vec![vec![(0.0, 2000.0), (1.0, 2010.0)]]);
        assert_eq!(data.forecast, vec![vec![(2.0, 2020.0)]]);
        assert_eq!(data.boundary, Some(1.5));
        assert_eq!(data.x_bounds, [0.0, 2.0]);
        assert_eq!(data.y_bounds, [1999.0, 2021.0]);
    }

    #[test]
    fn single_point_has_usable_bounds() {
        let merged = merge_series(&[HistoryPoint { date: "d".to_string(), actual: 5.0 }], &[]);
        let data = chart_series(&merged);
        assert_eq!(data.boundary, None);
        assert!(data.x_bounds[1] > data.x_bounds[0]);
        assert!(data.y_bounds[1] > data.y_bounds[0]);
    }

    #[test]
    fn tick_labels_snap_to_indices() {
        let labels = vec!["a".to_string(), "b".to_string()];
        assert_eq!(plotters_chart::label_at(&labels, 1.0), "b");
        assert_eq!(plotters_chart::label_at(&labels, 0.5), "");
        assert_eq!(plotters_chart::label_at(&labels, 7.0), "");
        assert_eq!(plotters_chart::label_at(&labels, -1.0), "");
    }
}
