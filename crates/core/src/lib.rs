//! convey-core - value-converter pipeline resolution, pure logic, no I/O.
//!
//! A registry of named bidirectional converters, pipelines that chain them
//! over a base expression, and a single-threaded binding engine that
//! re-evaluates live pipelines when their observed inputs change or a signal
//! token is raised. Parsing of any concrete binding syntax is the host's
//! responsibility; the resolver consumes already-parsed expressions.

pub mod convert;
pub mod engine;
pub mod error;
pub mod expr;
pub mod pipeline;
pub mod scope;
pub mod signal;

// Re-export commonly used types
pub use convert::{ConverterRegistry, ValueConverter, derived_name};
pub use engine::{BindingEngine, BindingId, BindingMode, BindingUpdate};
pub use error::{ConveyError, Result};
pub use expr::Expr;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineStep};
pub use scope::Scope;
pub use signal::SignalHub;
