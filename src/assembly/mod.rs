pub mod code;
pub mod error;
pub mod knee_wall;

pub use code::AssemblyCode;
pub use error::AssemblyCodeError;
pub use knee_wall::{AssemblyRecord, KneeWallConstants};
