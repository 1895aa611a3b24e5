// src/generate.rs

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::{
    assembly::{AssemblyCode, AssemblyRecord, KneeWallConstants},
    schema::{read_enum, KNEE_WALL_ASSEMBLY_CODES},
    table::{write_lookup_table, LookupRow},
};

/// Where the knee wall table generator reads from and writes to.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub schema_path: PathBuf,
    /// JSON Pointer to the assembly code enum inside the schema.
    pub enum_pointer: String,
    pub output_path: PathBuf,
    pub constants: KneeWallConstants,
}

impl GeneratorConfig {
    /// Default locations resolved against `root`, the ruleset directory
    /// (`<repo>/rulesets/HEScoreRuleset`). The schema lives in the sibling
    /// `hescore-hpxml` checkout at the repo top.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            schema_path: root
                .join("..")
                .join("..")
                .join("hescore-hpxml")
                .join("hescorehpxml")
                .join("schemas")
                .join("hescore_json.schema.json"),
            enum_pointer: KNEE_WALL_ASSEMBLY_CODES.to_owned(),
            output_path: root.join("resources").join("lu_knee_wall_eff_rvalue.csv"),
            constants: KneeWallConstants::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::rooted_at(env!("CARGO_MANIFEST_DIR"))
    }
}

/// Build the knee wall lookup table described by `config`.
///
/// Every code is parsed before anything is written; a bad code aborts the run
/// with the previous table left untouched.
#[instrument(level = "info", skip(config), fields(schema = %config.schema_path.display()))]
pub fn generate_knee_wall_table(config: &GeneratorConfig) -> Result<Vec<AssemblyRecord>> {
    if !config.schema_path.exists() {
        bail!("schema not found: {}", config.schema_path.display());
    }

    let codes = read_enum(&config.schema_path, &config.enum_pointer)?;
    info!("{} knee wall assembly codes", codes.len());

    let records = codes
        .iter()
        .map(|c| {
            let code = AssemblyCode::parse(c)?;
            Ok(AssemblyRecord::compute(code, &config.constants))
        })
        .collect::<Result<Vec<_>>>()
        .context("reading cavity R-values from assembly codes")?;

    let rows: Vec<LookupRow> = records.iter().map(LookupRow::from).collect();
    write_lookup_table(&config.output_path, &rows)?;
    info!(
        output = %config.output_path.display(),
        rows = rows.len(),
        "wrote knee wall lookup table"
    );

    Ok(records)
}
