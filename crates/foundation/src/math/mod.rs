pub mod precision;
pub mod projection;
pub mod vec;

pub use precision::*;
pub use projection::*;
pub use vec::*;
