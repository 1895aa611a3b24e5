pub mod write;

pub use write::{write_lookup_table, LookupRow};
