// Currency conversion over a shared, externally updated rate table
use super::{as_number, finite, str_arg};
use convey_core::ValueConverter;
use convey_core::error::{ConveyError, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Signal token raised after the rate table changes.
///
/// The table is invisible to dependency tracking, so hosts must raise this
/// through the binding engine after calling [`RateTable::set_rate`].
pub const RATES_UPDATED: &str = "rates-updated";

/// Exchange rates keyed by currency code, shared across converter instances.
#[derive(Clone, Default)]
pub struct RateTable {
    rates: Arc<RwLock<IndexMap<String, f64>>>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a rate. Remember to raise [`RATES_UPDATED`] afterwards.
    pub fn set_rate(&self, code: impl Into<String>, rate: f64) {
        let code = code.into();
        debug!("Rate '{}' set to {}", code, rate);
        self.write_lock().insert(code, rate);
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.read_lock().get(code).copied()
    }

    // Rates are plain floats, so a poisoned lock still holds usable data
    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, f64>> {
        self.rates.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, IndexMap<String, f64>> {
        self.rates.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// `currency:code` - convert a base amount into a currency via the shared
/// rate table; divide back on the way in.
///
/// Subscribes to [`RATES_UPDATED`] so bindings refresh when rates move even
/// though no tracked scope value changed.
pub struct CurrencyValueConverter {
    rates: RateTable,
}

impl CurrencyValueConverter {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    fn lookup(&self, args: &[Value]) -> Result<(String, f64)> {
        let code = str_arg(args, 0, "currency")?;
        let rate = self
            .rates
            .rate(code)
            .ok_or_else(|| ConveyError::conversion(format!("no rate for currency '{code}'")))?;
        Ok((code.to_string(), rate))
    }
}

impl ValueConverter for CurrencyValueConverter {
    fn to_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let amount = as_number(value, "currency")?;
        let (_, rate) = self.lookup(args)?;
        finite(amount * rate, "currency")
    }

    fn from_view(&self, value: &Value, args: &[Value]) -> Result<Value> {
        let amount = as_number(value, "currency")?;
        let (code, rate) = self.lookup(args)?;
        if rate == 0.0 {
            return Err(ConveyError::conversion(format!(
                "rate for '{code}' is 0, cannot invert"
            )));
        }
        finite(amount / rate, "currency")
    }

    fn is_invertible(&self) -> bool {
        true
    }

    fn signals(&self) -> &[&str] {
        &[RATES_UPDATED]
    }
}
