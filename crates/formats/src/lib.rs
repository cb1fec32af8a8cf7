pub mod emissions;
pub mod loader;
pub mod normalize;
pub mod world;

pub use emissions::*;
pub use loader::*;
pub use normalize::*;
pub use world::*;
