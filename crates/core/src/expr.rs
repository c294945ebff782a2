// Parsed expression sources for pipeline bases and step arguments
use crate::error::Result;
use crate::scope::Scope;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An argument or base-expression source, already parsed by the host.
///
/// The resolver never sees the host's concrete binding syntax; it is handed
/// literals and scope paths and evaluates both against the same observation
/// scope as the base value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Constant value supplied at parse time
    Literal(Value),
    /// Dotted lookup into the observation scope
    Path(Vec<String>),
}

impl Expr {
    /// Create a literal expression
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Create a path expression from dotted segments
    pub fn path<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Path(segments.into_iter().map(Into::into).collect())
    }

    /// Evaluate this expression against a scope
    pub fn eval(&self, scope: &Scope) -> Result<Value> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Path(segments) => scope.resolve_path(segments),
        }
    }

    /// The scope root this expression observes, if any.
    ///
    /// Literals observe nothing; a path observes its first segment.
    pub fn root(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Path(segments) => segments.first().map(String::as_str),
        }
    }
}
