// Numeric converters
use super::{as_number, as_str, finite, num_arg};
use convey_core::ValueConverter;
use convey_core::error::{ConveyError, Result};
use serde_json::Value;

/// `round:digits` - format a number to a fixed number of decimal places.
///
/// Produces a string (display form); the inverse parses it back into a
/// number, so precision beyond `digits` does not round-trip.
pub struct RoundValueConverter;

impl RoundValueConverter {
    fn digits(args: &[Value]) -> usize {
        args.first().and_then(Value::as_u64).unwrap_or(0) as usize
    }
}

impl ValueConverter for RoundValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let n = as_number(value, "round")?;
        Ok(Value::String(format!("{n:.prec$}", prec = Self::digits(args))))
    }

    fn from_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        let s = as_str(value, "round")?;
        let n: f64 = s
            .trim()
            .parse()
            .map_err(|_| ConveyError::conversion(format!("'{s}' is not a number")))?;
        finite(n, "round")
    }

    fn is_invertible(&self) -> bool {
        true
    }
}

/// `clamp:lo:hi` - clamp a number into an inclusive range.
///
/// The inverse is the identity: a clamped value is already a legal model
/// value.
pub struct ClampValueConverter;

impl ValueConverter for ClampValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let n = as_number(value, "clamp")?;
        let lo = num_arg(args, 0, "clamp")?;
        let hi = num_arg(args, 1, "clamp")?;
        if lo > hi {
            return Err(ConveyError::conversion(format!(
                "clamp range is inverted: {lo} > {hi}"
            )));
        }
        finite(n.max(lo).min(hi), "clamp")
    }

    fn from_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        Ok(value.clone())
    }

    fn is_invertible(&self) -> bool {
        true
    }
}

/// `scale:factor` - multiply by a factor; divide on the way back.
pub struct ScaleValueConverter;

impl ValueConverter for ScaleValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let n = as_number(value, "scale")?;
        let factor = num_arg(args, 0, "scale")?;
        finite(n * factor, "scale")
    }

    fn from_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let n = as_number(value, "scale")?;
        let factor = num_arg(args, 0, "scale")?;
        if factor == 0.0 {
            return Err(ConveyError::conversion("scale factor 0 is not invertible"));
        }
        finite(n / factor, "scale")
    }

    fn is_invertible(&self) -> bool {
        true
    }
}
