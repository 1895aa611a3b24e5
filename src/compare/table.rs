// src/compare/table.rs

use anyhow::{anyhow, bail, Context, Result};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::{collections::HashMap, path::Path};
use tracing::trace;

/// Cell spellings read as "missing", same set a pandas `read_csv` treats as NaN.
const MISSING: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

static MISSING_CELL: Cell = Cell::Missing;

/// A single cell of a results table.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    pub fn parse(raw: &str) -> Self {
        let v = raw.trim();
        if MISSING.contains(&v) {
            return Cell::Missing;
        }
        if let Ok(i) = v.parse::<i64>() {
            return Cell::Int(i);
        }
        match v.parse::<f64>() {
            // infinities are numbers; a NaN spelling not listed above is text
            Ok(f) if !f.is_nan() => Cell::Float(f),
            _ => Cell::Text(raw.to_owned()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_numeric_or_missing(&self) -> bool {
        !matches!(self, Cell::Text(_))
    }

    /// Text as written back out; missing cells become `None`.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(format_float(*f)),
            Cell::Text(s) => Some(s.clone()),
        }
    }
}

/// Float text in the style of pandas' `to_csv`: whole numbers keep a `.0`,
/// NaN is left empty.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".into() } else { "-inf".into() }
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// A results CSV keyed by its first column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsTable {
    /// Header of the index column.
    pub index_name: String,
    pub columns: Vec<String>,
    pub index: Vec<String>,
    /// `rows[i][j]` is the cell at `index[i]`, `columns[j]`.
    pub rows: Vec<Vec<Cell>>,
}

impl ResultsTable {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening {}", path.display()))?;

        let headers = rdr
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .clone();
        let mut header_iter = headers.iter();
        let index_name = header_iter
            .next()
            .ok_or_else(|| anyhow!("{} has an empty header", path.display()))?
            .to_owned();
        let columns: Vec<String> = header_iter.map(str::to_owned).collect();

        let mut index = Vec::new();
        let mut rows = Vec::new();
        for (n, record) in rdr.records().enumerate() {
            let record =
                record.with_context(|| format!("reading row {} of {}", n + 1, path.display()))?;
            // short rows read as missing at the end; long rows are an error
            if record.len() > headers.len() {
                bail!(
                    "row {} of {} has {} fields, header has {}",
                    n + 1,
                    path.display(),
                    record.len(),
                    headers.len()
                );
            }
            let mut fields = record.iter();
            index.push(fields.next().unwrap_or_default().to_owned());
            rows.push(fields.map(Cell::parse).collect());
        }
        trace!(path = %path.display(), rows = rows.len(), cols = columns.len(), "read results table");

        Ok(Self {
            index_name,
            columns,
            index,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Row position by index label; the first row wins on duplicates.
    pub fn row_lookup(&self) -> HashMap<&str, usize> {
        let mut map = HashMap::with_capacity(self.index.len());
        for (i, label) in self.index.iter().enumerate() {
            map.entry(label.as_str()).or_insert(i);
        }
        map
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of column `j`, top to bottom.
    pub fn column(&self, j: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| r.get(j).unwrap_or(&MISSING_CELL))
    }

    pub fn is_all_numeric(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .all(Cell::is_numeric_or_missing)
    }
}

/// Write a header row plus data rows as `\n`-terminated CSV.
pub fn write_csv<P: AsRef<Path>>(path: P, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
