use std::num::ParseIntError;
use thiserror::Error;

/// Failure to read a cavity R-value out of an assembly code.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssemblyCodeError {
    #[error("assembly code `{code}` does not match `{pattern}`")]
    Pattern { code: String, pattern: &'static str },

    #[error("assembly code `{code}` has an unreadable cavity R-value: {source}")]
    CavityValue {
        code: String,
        #[source]
        source: ParseIntError,
    },
}
