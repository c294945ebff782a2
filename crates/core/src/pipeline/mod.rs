// Pipeline module - chained converter application

pub mod builder;
pub mod core;

// Re-export core types
pub use builder::*;
pub use core::*;
