pub mod choropleth;
pub mod legend;
pub mod path;
pub mod symbology;
pub mod transition;

pub use choropleth::*;
