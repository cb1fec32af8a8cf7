pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod tooltip;
pub mod view_state;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use session::*;
