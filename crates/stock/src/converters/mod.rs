// Stock converters grouped by the kind of value they work on

pub mod collection;
pub mod currency;
pub mod number;
pub mod text;

use convey_core::error::{ConveyError, Result};
use serde_json::Value;

/// Extract a required string argument
pub(crate) fn str_arg<'a>(args: &'a [Value], index: usize, what: &str) -> Result<&'a str> {
    args.get(index)
        .and_then(Value::as_str)
        .ok_or_else(|| ConveyError::conversion(format!("{what} expects a string argument")))
}

/// Extract a required numeric argument
pub(crate) fn num_arg(args: &[Value], index: usize, what: &str) -> Result<f64> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| ConveyError::conversion(format!("{what} expects a numeric argument")))
}

/// Interpret the converted value as a number
pub(crate) fn as_number(value: &Value, what: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| ConveyError::conversion(format!("{what} expects a number")))
}

/// Interpret the converted value as a string
pub(crate) fn as_str<'a>(value: &'a Value, what: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| ConveyError::conversion(format!("{what} expects a string")))
}

/// Build a JSON number, rejecting non-finite results
pub(crate) fn finite(n: f64, what: &str) -> Result<Value> {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| ConveyError::conversion(format!("{what} produced a non-finite number")))
}
