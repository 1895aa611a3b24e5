use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::assembly::AssemblyRecord;

/// A formatted row of a doe2 lookup table, as it appears on disk.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct LookupRow {
    pub doe2code: String,
    #[serde(rename = "U-value")]
    pub u_value: String,
    #[serde(rename = "Eff-R-value")]
    pub eff_r_value: String,
}

impl From<&AssemblyRecord> for LookupRow {
    fn from(rec: &AssemblyRecord) -> Self {
        Self {
            doe2code: rec.code.to_string(),
            u_value: format!("{:.3}", rec.u_value),
            eff_r_value: format!("{:.1}", rec.r_value),
        }
    }
}

/// Write `rows` as CSV to `path`, header first, replacing whatever is there.
///
/// - lines end in `\r\n`, matching the table files already in the ruleset
/// - the table is built in a temp file next to `path` and renamed over it,
///   so a failed run leaves the previous table intact
pub fn write_lookup_table<P: AsRef<Path>>(path: P, rows: &[LookupRow]) -> Result<()> {
    let path = path.as_ref();
    let dir: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let tmp = NamedTempFile::new_in(&dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(tmp);

    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("writing row for {}", row.doe2code))?;
    }
    // an empty table still gets its header
    if rows.is_empty() {
        wtr.write_record(["doe2code", "U-value", "Eff-R-value"])?;
    }

    let mut tmp = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing {}: {}", path.display(), e.error()))?;
    tmp.flush()?;
    tmp.persist(path)
        .with_context(|| format!("renaming temp file -> {}", path.display()))?;

    debug!(path = %path.display(), rows = rows.len(), "wrote lookup table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{AssemblyCode, KneeWallConstants};
    use std::fs;
    use tempfile::tempdir;

    fn row(code: &str) -> LookupRow {
        let rec = AssemblyRecord::compute(
            AssemblyCode::parse(code).unwrap(),
            &KneeWallConstants::default(),
        );
        LookupRow::from(&rec)
    }

    #[test]
    fn test_row_formatting() {
        assert_eq!(
            row("kwwf00"),
            LookupRow {
                doe2code: "kwwf00".into(),
                u_value: "0.552".into(),
                eff_r_value: "1.8".into(),
            }
        );
    }

    #[test]
    fn test_write_header_and_crlf() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("lu_knee_wall_eff_rvalue.csv");
        write_lookup_table(&path, &[row("kwwf00"), row("kwwf13")]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "doe2code,U-value,Eff-R-value\r\nkwwf00,0.552,1.8\r\nkwwf13,0.092,10.9\r\n"
        );
    }

    #[test]
    fn test_empty_table_has_header() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("empty.csv");
        write_lookup_table(&path, &[]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "doe2code,U-value,Eff-R-value\r\n"
        );
    }

    #[test]
    fn test_overwrites_existing() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("lu.csv");
        fs::write(&path, "stale contents that are longer than the new table\n").unwrap();
        write_lookup_table(&path, &[row("kwwf07")]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "doe2code,U-value,Eff-R-value\r\nkwwf07,0.125,8.0\r\n");
        // only the table itself is left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_creates_missing_parent() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("resources").join("lu.csv");
        write_lookup_table(&path, &[row("kwwf11")]).unwrap();
        assert!(path.exists());
    }
}
