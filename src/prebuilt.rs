pub mod exclusions;
pub mod tilesets;

pub use exclusions::*;
