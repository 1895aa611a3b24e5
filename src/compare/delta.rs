// src/compare/delta.rs

use anyhow::{bail, Result};
use std::collections::HashSet;
use tracing::debug;

use super::table::{Cell, ResultsTable};

/// How two result tables were compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// `feature - base`, cell by cell.
    Difference,
    /// `1` where the cells differ, `0` where they match.
    Inequality,
}

/// Cell-wise comparison of a feature table against its base.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTable {
    pub mode: DeltaMode,
    pub index_name: String,
    pub columns: Vec<String>,
    pub index: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl DeltaTable {
    /// Header plus rows, with missing cells spelled `NA`.
    pub fn to_records(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let header = std::iter::once(self.index_name.clone())
            .chain(self.columns.iter().cloned())
            .collect();
        let rows = self
            .index
            .iter()
            .zip(&self.rows)
            .map(|(label, cells)| {
                std::iter::once(label.clone())
                    .chain(cells.iter().map(|c| c.render().unwrap_or_else(|| "NA".into())))
                    .collect()
            })
            .collect();
        (header, rows)
    }
}

/// Labels of the combined table: unchanged when both sides agree, otherwise
/// the sorted union.
fn align_labels(base: &[String], feature: &[String]) -> Vec<String> {
    if base == feature {
        return base.to_vec();
    }
    let mut seen = HashSet::new();
    let mut all: Vec<String> = base
        .iter()
        .chain(feature)
        .filter(|l| seen.insert(l.as_str()))
        .cloned()
        .collect();
    all.sort();
    all
}

/// Compare `feature` against `base`.
///
/// Numeric tables are subtracted after aligning rows and columns by label;
/// anything missing on either side comes out missing. Whole-number columns
/// that line up exactly stay whole numbers. If either table holds text the
/// comparison falls back to per-cell inequality, which needs both tables to
/// carry the same labels.
pub fn compare_tables(base: &ResultsTable, feature: &ResultsTable) -> Result<DeltaTable> {
    if base.is_all_numeric() && feature.is_all_numeric() {
        Ok(difference(base, feature))
    } else {
        inequality(base, feature)
    }
}

fn difference(base: &ResultsTable, feature: &ResultsTable) -> DeltaTable {
    let index = align_labels(&base.index, &feature.index);
    let columns = align_labels(&base.columns, &feature.columns);
    let same_index = base.index == feature.index;

    let base_rows = base.row_lookup();
    let feature_rows = feature.row_lookup();

    let base_cols: Vec<Option<usize>> = columns.iter().map(|c| base.column_position(c)).collect();
    let feature_cols: Vec<Option<usize>> =
        columns.iter().map(|c| feature.column_position(c)).collect();

    // whole-number output only where nothing could have been filled in
    let integral: Vec<bool> = base_cols
        .iter()
        .zip(&feature_cols)
        .map(|(b, f)| match (b, f) {
            (Some(b), Some(f)) => {
                same_index
                    && base.column(*b).all(|c| matches!(c, Cell::Int(_)))
                    && feature.column(*f).all(|c| matches!(c, Cell::Int(_)))
            }
            _ => false,
        })
        .collect();

    let rows = index
        .iter()
        .map(|label| {
            let b_row = base_rows.get(label.as_str()).map(|&i| &base.rows[i]);
            let f_row = feature_rows.get(label.as_str()).map(|&i| &feature.rows[i]);
            (0..columns.len())
                .map(|j| {
                    let b = b_row.zip(base_cols[j]).and_then(|(r, k)| r.get(k));
                    let f = f_row.zip(feature_cols[j]).and_then(|(r, k)| r.get(k));
                    match (b, f) {
                        (Some(Cell::Int(b)), Some(Cell::Int(f))) if integral[j] => {
                            Cell::Int(f.wrapping_sub(*b))
                        }
                        (Some(b), Some(f)) => match (b.as_f64(), f.as_f64()) {
                            (Some(b), Some(f)) if !(f - b).is_nan() => Cell::Float(f - b),
                            _ => Cell::Missing,
                        },
                        _ => Cell::Missing,
                    }
                })
                .collect()
        })
        .collect();

    debug!(rows = index.len(), cols = columns.len(), "numeric delta");
    DeltaTable {
        mode: DeltaMode::Difference,
        index_name: base.index_name.clone(),
        columns,
        index,
        rows,
    }
}

fn inequality(base: &ResultsTable, feature: &ResultsTable) -> Result<DeltaTable> {
    if base.index != feature.index || base.columns != feature.columns {
        bail!("can only compare identically-labeled tables when they hold text");
    }

    let rows = base
        .rows
        .iter()
        .zip(&feature.rows)
        .map(|(b_row, f_row)| {
            b_row
                .iter()
                .zip(f_row)
                .map(|(b, f)| {
                    // missing never equals missing
                    let same = match (b, f) {
                        (Cell::Missing, _) | (_, Cell::Missing) => false,
                        (b, f) => match (b.as_f64(), f.as_f64()) {
                            (Some(x), Some(y)) => x == y,
                            _ => b == f,
                        },
                    };
                    Cell::Int(i64::from(!same))
                })
                .collect()
        })
        .collect();

    debug!(rows = base.len(), cols = base.columns.len(), "inequality delta");
    Ok(DeltaTable {
        mode: DeltaMode::Inequality,
        index_name: base.index_name.clone(),
        columns: base.columns.clone(),
        index: base.index.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[(&str, &[&str])]) -> ResultsTable {
        ResultsTable {
            index_name: "OSW".into(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            index: rows.iter().map(|(l, _)| l.to_string()).collect(),
            rows: rows
                .iter()
                .map(|(_, cells)| cells.iter().map(|c| Cell::parse(c)).collect())
                .collect(),
        }
    }

    #[test]
    fn test_numeric_difference() {
        let base = table(&["a", "b"], &[("x", &["1", "2.5"]), ("y", &["3", "4.0"])]);
        let feature = table(&["a", "b"], &[("x", &["2", "2.0"]), ("y", &["3", "5.5"])]);

        let delta = compare_tables(&base, &feature).unwrap();
        assert_eq!(delta.mode, DeltaMode::Difference);
        let (header, rows) = delta.to_records();
        assert_eq!(header, ["OSW", "a", "b"]);
        assert_eq!(rows, [["x", "1", "-0.5"], ["y", "0", "1.5"]]);
    }

    #[test]
    fn test_misaligned_rows_and_columns() {
        let base = table(&["a"], &[("x", &["1"]), ("y", &["2"])]);
        let feature = table(&["b", "a"], &[("z", &["7", "9"]), ("x", &["8", "4"])]);

        let (header, rows) = compare_tables(&base, &feature).unwrap().to_records();
        assert_eq!(header, ["OSW", "a", "b"]);
        assert_eq!(
            rows,
            [["x", "3.0", "NA"], ["y", "NA", "NA"], ["z", "NA", "NA"]]
        );
    }

    #[test]
    fn test_missing_cell_stays_missing() {
        let base = table(&["a"], &[("x", &[""]), ("y", &["1.5"])]);
        let feature = table(&["a"], &[("x", &["2"]), ("y", &["1.0"])]);

        let (_, rows) = compare_tables(&base, &feature).unwrap().to_records();
        assert_eq!(rows, [["x", "NA"], ["y", "-0.5"]]);
    }

    #[test]
    fn test_infinities_stay_numeric() {
        let base = table(&["% diff"], &[("heat", &["inf"]), ("cool", &["10.0"])]);
        let feature = table(&["% diff"], &[("heat", &["inf"]), ("cool", &["-inf"])]);

        let delta = compare_tables(&base, &feature).unwrap();
        assert_eq!(delta.mode, DeltaMode::Difference);
        let (_, rows) = delta.to_records();
        assert_eq!(rows, [["heat", "NA"], ["cool", "-inf"]]);
    }

    #[test]
    fn test_text_falls_back_to_inequality() {
        let base = table(&["fuel", "kbtu"], &[("x", &["Gas", "10"]), ("y", &["", "2"])]);
        let feature = table(&["fuel", "kbtu"], &[("x", &["Gas", "12"]), ("y", &["", "2.0"])]);

        let delta = compare_tables(&base, &feature).unwrap();
        assert_eq!(delta.mode, DeltaMode::Inequality);
        let (_, rows) = delta.to_records();
        assert_eq!(rows, [["x", "0", "1"], ["y", "1", "0"]]);
    }

    #[test]
    fn test_inequality_needs_matching_labels() {
        let base = table(&["fuel"], &[("x", &["Gas"])]);
        let feature = table(&["fuel"], &[("y", &["Gas"])]);
        assert!(compare_tables(&base, &feature).is_err());
    }
}
