// Text converters
use super::{as_str, str_arg};
use convey_core::ValueConverter;
use convey_core::error::{ConveyError, Result};
use regex::Regex;
use serde_json::Value;

/// `upper` - uppercase a string. One-way: the original casing is lost.
pub struct UpperValueConverter;

impl ValueConverter for UpperValueConverter {
    fn to_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        Ok(Value::String(as_str(value, "upper")?.to_uppercase()))
    }
}

/// `lower` - lowercase a string. One-way.
pub struct LowerValueConverter;

impl ValueConverter for LowerValueConverter {
    fn to_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        Ok(Value::String(as_str(value, "lower")?.to_lowercase()))
    }
}

/// `prefix:text` - prepend a marker; stripped again on the way back.
///
/// Numbers are formatted before prefixing, so `1234.50 | prefix:$` reads as
/// expected. The inverse only accepts strings that still carry the prefix.
pub struct PrefixValueConverter;

impl ValueConverter for PrefixValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let prefix = str_arg(args, 0, "prefix")?;
        let body = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => {
                return Err(ConveyError::conversion(format!(
                    "prefix expects a string or number, got {other}"
                )));
            }
        };
        Ok(Value::String(format!("{prefix}{body}")))
    }

    fn from_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let prefix = str_arg(args, 0, "prefix")?;
        let s = as_str(value, "prefix")?;
        let stripped = s.strip_prefix(prefix).ok_or_else(|| {
            ConveyError::conversion(format!("value does not start with '{prefix}'"))
        })?;
        Ok(Value::String(stripped.to_string()))
    }

    fn is_invertible(&self) -> bool {
        true
    }
}

/// `replace:pattern:replacement` - regex substitution over a string. One-way.
pub struct ReplaceValueConverter;

impl ValueConverter for ReplaceValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let pattern = str_arg(args, 0, "replace")?;
        let replacement = str_arg(args, 1, "replace")?;
        let s = as_str(value, "replace")?;

        // Patterns may be dynamic expressions, so compilation happens per
        // evaluation and a bad pattern is an evaluation-time failure
        let re = Regex::new(pattern)
            .map_err(|e| ConveyError::conversion(format!("invalid pattern: {e}")))?;
        Ok(Value::String(re.replace_all(s, replacement).into_owned()))
    }
}
