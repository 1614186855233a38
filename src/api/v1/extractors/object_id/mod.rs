mod core;
mod types;

pub use self::core::PathId;
pub use types::*;
