/// Unified error type for convey
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConveyError {
    // Configuration errors - detectable before evaluation
    #[error("Unknown converter: '{0}'")]
    UnknownConverter(String),

    #[error("Converter '{0}' is already registered")]
    DuplicateName(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Capability errors - detectable only when inversion is attempted
    #[error("Converter '{0}' does not support from_view")]
    NonInvertible(String),

    // Expression evaluation errors
    #[error("Expression error: {0}")]
    Expr(String),

    // Converter-internal failures, propagated unchanged
    #[error("Conversion error: {0}")]
    Conversion(String),

    // Generic error for compatibility
    #[error("{0}")]
    Other(String),
}

/// Result type alias using ConveyError
pub type Result<T> = std::result::Result<T, ConveyError>;

impl ConveyError {
    /// Create an unknown converter error
    pub fn unknown_converter(name: impl Into<String>) -> Self {
        Self::UnknownConverter(name.into())
    }

    /// Create a duplicate name error
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a non-invertible error
    pub fn non_invertible(name: impl Into<String>) -> Self {
        Self::NonInvertible(name.into())
    }

    /// Create an expression error
    pub fn expr(msg: impl Into<String>) -> Self {
        Self::Expr(msg.into())
    }

    /// Create a conversion error
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

// Conversion from String for convenience
impl From<String> for ConveyError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

// Conversion from &str for convenience
impl From<&str> for ConveyError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ConveyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Conversion(err.to_string())
    }
}
