pub mod enums;

pub use enums::{enum_strings, load_schema, read_enum, KNEE_WALL_ASSEMBLY_CODES};
