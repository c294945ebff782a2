/// Centralized error handling for convey
pub mod convey;

pub use convey::{ConveyError, Result};
