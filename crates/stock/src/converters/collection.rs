// Collection and structural converters
use super::as_str;
use convey_core::ValueConverter;
use convey_core::error::{ConveyError, Result};
use serde_json::Value;
use std::cmp::Ordering;

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| ConveyError::conversion(format!("{what} expects an array")))
}

/// `sort[:dir]` - sort an array for display. One-way.
///
/// Strings compare in natural order ("a2" before "a10"); numbers compare
/// numerically; anything else falls back to its JSON text. `dir` is `asc`
/// (default) or `desc`.
pub struct SortValueConverter;

impl SortValueConverter {
    fn compare(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::String(x), Value::String(y)) => natord::compare(x, y),
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            _ => natord::compare(&a.to_string(), &b.to_string()),
        }
    }
}

impl ValueConverter for SortValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let descending = match args.first().and_then(Value::as_str) {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(ConveyError::conversion(format!(
                    "sort direction must be 'asc' or 'desc', got '{other}'"
                )));
            }
        };

        let mut items = as_array(value, "sort")?.clone();
        items.sort_by(Self::compare);
        if descending {
            items.reverse();
        }
        Ok(Value::Array(items))
    }
}

/// `take:n` - keep the first `n` items of an array. One-way.
pub struct TakeValueConverter;

impl ValueConverter for TakeValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let n = args
            .first()
            .and_then(Value::as_u64)
            .ok_or_else(|| ConveyError::conversion("take expects a count argument"))? as usize;

        let items = as_array(value, "take")?;
        Ok(Value::Array(items.iter().take(n).cloned().collect()))
    }
}

/// `json` - pretty-print any value as a JSON string; parse it back.
pub struct JsonValueConverter;

impl ValueConverter for JsonValueConverter {
    fn to_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        let text = serde_json::to_string_pretty(value)?;
        Ok(Value::String(text))
    }

    fn from_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        let text = as_str(value, "json")?;
        Ok(serde_json::from_str(text)?)
    }

    fn is_invertible(&self) -> bool {
        true
    }
}
