// src/compare/visualize.rs

use plotly::{
    common::{DashType, Line, Marker, Mode, Title},
    layout::{Axis, GridPattern, Layout, LayoutGrid},
    Plot, Scatter,
};
use std::collections::BTreeSet;

use super::table::{Cell, ResultsTable};

/// Column names containing any of these are run bookkeeping, not results.
pub const SKIPPED_COLUMN_MARKERS: &[&str] = &[
    ".include_",
    ".timeseries_",
    ".output_format",
    "completed_status",
    ".applicable",
    "upgrade_name",
    "upgrade_cost_",
];

fn is_all_zero(table: &ResultsTable, name: &str) -> bool {
    match table.column_position(name) {
        Some(j) => table.column(j).all(|c| c.as_f64() == Some(0.0)),
        None => true,
    }
}

/// Columns worth a scatter: the sorted union of both tables, minus columns
/// that are zero everywhere on both sides and bookkeeping columns.
pub fn plot_columns(base: &ResultsTable, feature: &ResultsTable) -> Vec<String> {
    let all: BTreeSet<&String> = base.columns.iter().chain(&feature.columns).collect();
    all.into_iter()
        .filter(|name| !(is_all_zero(base, name) && is_all_zero(feature, name)))
        .filter(|name| !SKIPPED_COLUMN_MARKERS.iter().any(|m| name.contains(m)))
        .cloned()
        .collect()
}

/// Base values of `name` in base row order, with the feature value for the
/// same row label alongside.
fn paired_values(
    base: &ResultsTable,
    feature: &ResultsTable,
    name: &str,
) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let feature_rows = feature.row_lookup();
    let b_col = base.column_position(name);
    let f_col = feature.column_position(name);

    base.index
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let x = b_col
                .and_then(|j| base.rows[i].get(j))
                .and_then(Cell::as_f64);
            let y = feature_rows
                .get(label.as_str())
                .zip(f_col)
                .and_then(|(&r, j)| feature.rows[r].get(j))
                .and_then(Cell::as_f64);
            (x, y)
        })
        .unzip()
}

/// Axis span covering both sides with 10% headroom, always including zero.
pub fn axis_range(xs: &[Option<f64>], ys: &[Option<f64>]) -> (f64, f64) {
    let values = || xs.iter().chain(ys).flatten().copied();
    let lo = values().fold(f64::INFINITY, f64::min);
    let hi = values().fold(f64::NEG_INFINITY, f64::max);

    let mut range = (0.0, 0.0);
    if lo.is_finite() && 0.9 * lo < range.0 {
        range.0 = 0.9 * lo;
    }
    if hi.is_finite() && 1.1 * hi > range.1 {
        range.1 = 1.1 * hi;
    }
    range
}

fn axis_ref(prefix: &str, n: usize) -> String {
    if n == 1 {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, n)
    }
}

/// One base-vs-feature scatter per column, stacked vertically, each with
/// 0% and ±10% error lines.
pub fn build_plot(title: &str, base: &ResultsTable, feature: &ResultsTable) -> Plot {
    let columns = plot_columns(base, feature);
    let mut plot = Plot::new();

    for (i, name) in columns.iter().enumerate() {
        let n = i + 1;
        let (xa, ya) = (axis_ref("x", n), axis_ref("y", n));
        let first = n == 1;

        let (xs, ys) = paired_values(base, feature, name);
        let (lo, hi) = axis_range(&xs, &ys);

        let points = Scatter::new(xs, ys)
            .mode(Mode::Markers)
            .marker(Marker::new().size(8))
            .text_array(base.index.clone())
            .name(name)
            .legend_group(name)
            .x_axis(&xa)
            .y_axis(&ya);
        plot.add_trace(points);

        for (label, scale, dash, show) in [
            ("0% Error", 1.0, DashType::Dash, first),
            ("+/- 10% Error", 0.9, DashType::DashDot, first),
            ("+/- 10% Error", 1.1, DashType::DashDot, false),
        ] {
            let line = Scatter::new(vec![lo, hi], vec![scale * lo, scale * hi])
                .mode(Mode::Lines)
                .line(Line::new().color("black").dash(dash).width(1.0))
                .name(label)
                .show_legend(show)
                .x_axis(&xa)
                .y_axis(&ya);
            plot.add_trace(line);
        }
    }

    let rows = columns.len().max(1);
    let layout = Layout::new()
        .title(Title::new(title))
        .grid(
            LayoutGrid::new()
                .rows(rows)
                .columns(1)
                .pattern(GridPattern::Independent),
        )
        .x_axis(Axis::new().title(Title::new("base")))
        .y_axis(Axis::new().title(Title::new("feature")))
        .width(800)
        .height(600 * rows)
        .auto_size(false);
    plot.set_layout(layout);
    plot
}
