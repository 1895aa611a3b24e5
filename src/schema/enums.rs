// src/schema/enums.rs

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::{fs, path::Path};
use tracing::{debug, instrument};

/// Location of the knee wall `assembly_code` enum inside the HEScore JSON schema.
pub const KNEE_WALL_ASSEMBLY_CODES: &str = "/properties/building/properties/zone/properties/zone_roof/items/properties/knee_wall/properties/assembly_code/enum";

/// Read and parse a JSON schema document.
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let f = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(f).with_context(|| format!("parsing {}", path.display()))
}

/// Pull the string array at `pointer` out of `schema`, keeping document order.
///
/// Fails if the pointer does not resolve, does not point at an array, or any
/// entry is not a string.
pub fn enum_strings(schema: &Value, pointer: &str) -> Result<Vec<String>> {
    let node = schema
        .pointer(pointer)
        .ok_or_else(|| anyhow!("`{}` not found in schema", pointer))?;
    let items = node
        .as_array()
        .ok_or_else(|| anyhow!("`{}` is not an array", pointer))?;

    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| anyhow!("`{}` entry {} is not a string: {}", pointer, idx, item))
        })
        .collect()
}

/// Load the schema at `path` and return the enum at `pointer`.
#[instrument(level = "debug", skip(path), fields(schema = %path.as_ref().display()))]
pub fn read_enum<P: AsRef<Path>>(path: P, pointer: &str) -> Result<Vec<String>> {
    let schema = load_schema(&path)?;
    let values = enum_strings(&schema, pointer)?;
    debug!(count = values.len(), "read enum values");
    Ok(values)
}
