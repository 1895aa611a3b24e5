pub mod assembly;
pub mod compare;
pub mod generate;
pub mod schema;
pub mod table;

pub use assembly::{AssemblyCode, AssemblyCodeError, AssemblyRecord, KneeWallConstants};
pub use generate::{generate_knee_wall_table, GeneratorConfig};
