// Converter module - capability trait, registry and naming convention

pub mod naming;
pub mod registry;

use crate::error::{ConveyError, Result};
use serde_json::Value;

/// A named, optionally bidirectional value conversion.
///
/// `to_view` maps a model value to its display form; `from_view` maps user
/// input back to a model value. Implementations must be pure and synchronous:
/// evaluation runs on the host's render tick and must not block or suspend.
///
/// Implementations that override `from_view` must also report
/// `is_invertible() == true`, otherwise the pipeline rejects the inversion
/// before the method is reached.
pub trait ValueConverter: Send + Sync {
    /// Convert a model value to its view-facing form.
    ///
    /// `args` are the current values of the step's argument expressions, in
    /// declared order. A single object-shaped argument is passed through
    /// undistinguished; reading named fields out of it is the converter's
    /// own convention.
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value>;

    /// Convert a view-facing value back to its model form.
    ///
    /// The default implementation fails: converters are one-directional
    /// unless they opt in.
    fn from_view(&self, _value: &Value, _args: &[Value]) -> Result<Value> {
        Err(ConveyError::non_invertible("<unnamed>"))
    }

    /// Whether this converter supports `from_view`.
    fn is_invertible(&self) -> bool {
        false
    }

    /// Signal tokens that force re-evaluation of bindings using this
    /// converter even though no tracked input changed.
    fn signals(&self) -> &[&str] {
        &[]
    }
}

impl std::fmt::Debug for dyn ValueConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ValueConverter")
    }
}

pub use naming::derived_name;
pub use registry::ConverterRegistry;
