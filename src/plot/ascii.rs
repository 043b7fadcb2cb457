//! ASCII trend chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each metric is drawn as a line with its own glyph. Lines never overwrite
//! each other; earlier metrics win where they cross.

use crate::domain::{FilteredView, Metric};
use crate::report::fmt_thousands;

/// Draw order and glyph per metric.
const SERIES: [(Metric, char); 4] = [
    (Metric::Cases, 'c'),
    (Metric::Recovered, 'r'),
    (Metric::Deaths, 'd'),
    (Metric::Vaccinations, 'v'),
];

/// Render `view` as a `width` x `height` character chart under `title`.
pub fn render_ascii_chart(view: &FilteredView, title: &str, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (Some(first), Some(last)) = (view.first_date(), view.last_date()) else {
        return format!("{title}\nNo data to plot.\n");
    };

    let xs: Vec<f64> = view
        .records()
        .iter()
        .map(|r| (r.date - first).num_days() as f64)
        .collect();
    let (t_min, t_max) = pad_degenerate(0.0, xs.last().copied().unwrap_or(0.0));

    let y_top = view
        .records()
        .iter()
        .flat_map(|r| Metric::ALL.map(|m| r.value(m)))
        .max()
        .unwrap_or(0);
    let (y_min, y_max) = pad_range(0.0, (y_top as f64).max(1.0), 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for (metric, glyph) in SERIES {
        let points: Vec<(f64, f64)> = xs
            .iter()
            .zip(view.records())
            .map(|(&x, r)| (x, r.value(metric) as f64))
            .collect();
        draw_series(&mut grid, &points, glyph, (t_min, t_max), (y_min, y_max));
    }

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&format!(
        "x: {first} .. {last} | y: 0 .. {}\n",
        fmt_thousands(y_top)
    ));
    out.push_str("legend: c cases  r recovered  d deaths  v vaccinations\n");

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// A single-day view has no x extent; centre it.
fn pad_degenerate(min: f64, max: f64) -> (f64, f64) {
    if max > min {
        (min, max)
    } else {
        (min - 0.5, max + 0.5)
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], points: &[(f64, f64)], ch: char, x_range: (f64, f64), y_range: (f64, f64)) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in points {
        let x = map_x(t, x_range.0, x_range.1, width);
        let yy = map_y(y, y_range.0, y_range.1, height);
        let (x0, y0) = prev.unwrap_or((x, yy));
        draw_line(grid, x0, y0, x, yy, ch);
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills blank cells.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlignedRecord;
    use chrono::NaiveDate;

    fn record(day: u32, cases: u64, recovered: u64) -> AlignedRecord {
        AlignedRecord {
            date: NaiveDate::from_ymd_opt(2021, 1, day).unwrap(),
            cases,
            deaths: 0,
            recovered,
            vaccinations: 0,
        }
    }

    #[test]
    fn chart_golden_snapshot_small() {
        let view = FilteredView::new(None, vec![record(1, 10, 5), record(2, 20, 5)]);

        let txt = render_ascii_chart(&view, "T", 10, 5);
        let expected = concat!(
            "T\n",
            "x: 2021-01-01 .. 2021-01-02 | y: 0 .. 20\n",
            "legend: c cases  r recovered  d deaths  v vaccinations\n",
            "       ccc\n",
            "   cccc   \n",
            "ccc       \n",
            "rrrrrrrrrr\n",
            "dddddddddd\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn single_day_view_is_centred() {
        let view = FilteredView::new(None, vec![record(5, 8, 3)]);
        let txt = render_ascii_chart(&view, "T", 11, 5);
        let rows: Vec<&str> = txt.lines().skip(3).collect();
        assert_eq!(rows.len(), 5);
        // Only the middle column is drawn.
        for row in rows {
            assert!(row.chars().enumerate().all(|(i, ch)| i == 5 || ch == ' '), "{row:?}");
        }
    }

    #[test]
    fn empty_view_renders_a_hint() {
        let txt = render_ascii_chart(&FilteredView::default(), "T", 10, 5);
        assert_eq!(txt, "T\nNo data to plot.\n");
    }
}
