//! ASCII plotting for terminal output.
//!
//! Fixed-size grid, deterministic output (golden tests below). The x axis is
//! the label index; gaps (`None`) break a line.
//!
//! Plot elements:
//! - actual points `o`, joined by `-`
//! - forecast points `*`, joined by `~`
//! - `|` column where the forecast region starts

use crate::domain::MergedSeries;

/// Render both series of `merged` onto a `width` x `height` grid.
pub fn render_ascii_plot(merged: &MergedSeries, width: usize, height: usize) -> String {
    if merged.is_empty() {
        return "Plot: no data\n".to_string();
    }

    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = merged
        .value_range()
        .map(|(lo, hi)| if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) })
        .unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let x_max = (merged.len().saturating_sub(1)).max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so points overlay them.
    draw_series_line(&mut grid, &merged.actual, x_max, y_min, y_max, '-');
    draw_series_line(&mut grid, &merged.forecast, x_max, y_min, y_max, '~');
    draw_series_points(&mut grid, &merged.actual, x_max, y_min, y_max, 'o');
    draw_series_points(&mut grid, &merged.forecast, x_max, y_min, y_max, '*');

    let boundary = merged.boundary();
    if boundary > 0 && boundary < merged.len() {
        let x = map_x(boundary as f64 - 0.5, x_max, width);
        for row in grid.iter_mut() {
            if row[x] == ' ' {
                row[x] = '|';
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} .. {} (n={}) | y=[{y_min:.2}, {y_max:.2}]\n",
        merged.labels[0],
        merged.labels[merged.len() - 1],
        merged.len(),
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("o actual  * forecast  | forecast start\n");
    out
}

fn draw_series_line(
    grid: &mut [Vec<char>],
    series: &[Option<f64>],
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev: Option<(usize, usize)> = None;
    for (i, v) in series.iter().enumerate() {
        let Some(y) = v.filter(|y| y.is_finite()) else {
            prev = None;
            continue;
        };
        let x = map_x(i as f64, x_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, ch);
        }
        prev = Some((x, yy));
    }
}

fn draw_series_points(
    grid: &mut [Vec<char>],
    series: &[Option<f64>],
    x_max: f64,
    y_min: f64,
    y_max: f64,
    ch: char,
) {
    let height = grid.len();
    let width = grid[0].len();
    for (i, v) in series.iter().enumerate() {
        if let Some(y) = v.filter(|y| y.is_finite()) {
            grid[map_y(y, y_min, y_max, height)][map_x(i as f64, x_max, width)] = ch;
        }
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (i / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham). Only writes into blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
