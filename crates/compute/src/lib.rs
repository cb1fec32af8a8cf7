pub mod analysis;
pub mod year_index;

pub use year_index::*;
