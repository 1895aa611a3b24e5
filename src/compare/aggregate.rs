// src/compare/aggregate.rs

use clap::ValueEnum;
use std::fmt;

use super::table::{format_float, Cell, ResultsTable};

/// How a column of results is collapsed into one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregateFunction {
    Sum,
    Mean,
}

impl AggregateFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Mean => "mean",
        }
    }

    /// Apply to the non-missing values of a column. A mean of nothing is NaN.
    pub fn apply<I: IntoIterator<Item = f64>>(&self, values: I) -> f64 {
        let (total, count) = values
            .into_iter()
            .fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
        match self {
            AggregateFunction::Sum => total,
            AggregateFunction::Mean if count == 0 => f64::NAN,
            AggregateFunction::Mean => total / count as f64,
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Column aggregate of every numeric column, keyed by column name in table
/// order. Columns holding any text are left out.
fn numeric_aggregates(table: &ResultsTable, func: AggregateFunction) -> Vec<(String, f64)> {
    table
        .columns
        .iter()
        .enumerate()
        .filter(|(j, _)| table.column(*j).all(Cell::is_numeric_or_missing))
        .map(|(j, name)| {
            let value = func.apply(table.column(j).filter_map(Cell::as_f64));
            (name.clone(), value)
        })
        .collect()
}

/// Side-by-side aggregate of a base and a feature table.
///
/// The first row counts simulations on each side; the remaining rows carry
/// one numeric column of the base table each, with the feature value,
/// the difference and the percent difference. Values are rounded to two
/// places; a value that cannot be formed is left empty.
pub fn summarize(
    base: &ResultsTable,
    feature: &ResultsTable,
    func: AggregateFunction,
) -> (Vec<String>, Vec<Vec<String>>) {
    let header = ["enduse", "base", "feature", "diff", "% diff"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = vec![vec![
        "simulation_count".to_string(),
        base.len().to_string(),
        feature.len().to_string(),
        "n/a".to_string(),
        "n/a".to_string(),
    ]];

    let feature_values = numeric_aggregates(feature, func);
    for (name, b) in numeric_aggregates(base, func) {
        let f = feature_values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .unwrap_or(f64::NAN);
        let diff = f - b;
        let pct = 100.0 * (diff / b);
        rows.push(
            std::iter::once(name)
                .chain([b, f, diff, pct].into_iter().map(|v| format_float(round2(v))))
                .collect(),
        );
    }

    (header, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> ResultsTable {
        ResultsTable {
            index_name: "OSW".into(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            index: (0..rows.len()).map(|i| format!("run{i}.xml")).collect(),
            rows: rows
                .iter()
                .map(|cells| cells.iter().map(|c| Cell::parse(c)).collect())
                .collect(),
        }
    }

    #[test]
    fn test_apply() {
        assert_eq!(AggregateFunction::Sum.apply([1.0, 2.0, 3.5]), 6.5);
        assert_eq!(AggregateFunction::Mean.apply([1.0, 2.0, 3.0]), 2.0);
        assert_eq!(AggregateFunction::Sum.apply([]), 0.0);
        assert!(AggregateFunction::Mean.apply([]).is_nan());
    }

    #[test]
    fn test_summarize_sum() {
        let base = table(&["heat", "fuel"], &[&["10", "Gas"], &["20", "Gas"]]);
        let feature = table(&["heat", "fuel"], &[&["12", "Gas"], &["21", "Gas"]]);

        let (header, rows) = summarize(&base, &feature, AggregateFunction::Sum);
        assert_eq!(header, ["enduse", "base", "feature", "diff", "% diff"]);
        assert_eq!(
            rows,
            [
                ["simulation_count", "2", "2", "n/a", "n/a"],
                ["heat", "30.0", "33.0", "3.0", "10.0"],
            ]
        );
    }

    #[test]
    fn test_summarize_mean_with_missing() {
        let base = table(&["cool"], &[&["1"], &[""], &["2"]]);
        let feature = table(&["cool"], &[&["2"], &["2"]]);

        let (_, rows) = summarize(&base, &feature, AggregateFunction::Mean);
        assert_eq!(rows[0], ["simulation_count", "3", "2", "n/a", "n/a"]);
        assert_eq!(rows[1], ["cool", "1.5", "2.0", "0.5", "33.33"]);
    }

    #[test]
    fn test_summarize_zero_base() {
        let base = table(&["a", "b"], &[&["0", "0"]]);
        let feature = table(&["a"], &[&["4"]]);

        let (_, rows) = summarize(&base, &feature, AggregateFunction::Sum);
        assert_eq!(rows[1], ["a", "0.0", "4.0", "4.0", "inf"]);
        // column missing from the feature side
        assert_eq!(rows[2], ["b", "0.0", "", "", ""]);
    }
}
