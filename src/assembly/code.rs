// src/assembly/code.rs

use once_cell::sync::Lazy;
use regex::Regex;
use std::{fmt, str::FromStr};
use tracing::trace;

use super::AssemblyCodeError;

const KNEE_WALL_PATTERN: &str = r"^kwwf([0-9]+)";

static KNEE_WALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(KNEE_WALL_PATTERN).expect("knee wall pattern is valid"));

/// A doe2 knee wall assembly code such as `kwwf13`, with the nominal cavity
/// insulation R-value read from its digits.
///
/// Only the prefix is matched, so anything after the digits is carried along
/// in `code` but ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyCode {
    code: String,
    cavity_r_value: u32,
}

impl AssemblyCode {
    pub fn parse(code: &str) -> Result<Self, AssemblyCodeError> {
        let digits = KNEE_WALL_RE
            .captures(code)
            .and_then(|c| c.get(1))
            .ok_or_else(|| AssemblyCodeError::Pattern {
                code: code.to_owned(),
                pattern: KNEE_WALL_PATTERN,
            })?
            .as_str();

        let cavity_r_value = digits
            .parse::<u32>()
            .map_err(|source| AssemblyCodeError::CavityValue {
                code: code.to_owned(),
                source,
            })?;
        trace!(code, cavity_r_value, "parsed assembly code");

        Ok(Self {
            code: code.to_owned(),
            cavity_r_value,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Nominal R-value of the cavity insulation (0 for an uninsulated cavity).
    pub fn cavity_r_value(&self) -> u32 {
        self.cavity_r_value
    }
}

impl FromStr for AssemblyCode {
    type Err = AssemblyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AssemblyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}
