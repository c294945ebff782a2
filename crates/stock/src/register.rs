// Converter registration for stock converters
use convey_core::ConverterRegistry;
use convey_core::error::Result;

use crate::converters::collection::{JsonValueConverter, SortValueConverter, TakeValueConverter};
use crate::converters::currency::{CurrencyValueConverter, RateTable};
use crate::converters::number::{ClampValueConverter, RoundValueConverter, ScaleValueConverter};
use crate::converters::text::{
    LowerValueConverter, PrefixValueConverter, ReplaceValueConverter, UpperValueConverter,
};

/// Register all stock converters under their convention-derived names
/// (`UpperValueConverter` -> `upper`, and so on).
pub fn register_converters(registry: &ConverterRegistry, rates: &RateTable) -> Result<()> {
    // Text converters
    registry.register_by_convention(UpperValueConverter)?;
    registry.register_by_convention(LowerValueConverter)?;
    registry.register_by_convention(PrefixValueConverter)?;
    registry.register_by_convention(ReplaceValueConverter)?;

    // Numeric converters
    registry.register_by_convention(RoundValueConverter)?;
    registry.register_by_convention(ClampValueConverter)?;
    registry.register_by_convention(ScaleValueConverter)?;

    // Collection converters
    registry.register_by_convention(SortValueConverter)?;
    registry.register_by_convention(TakeValueConverter)?;
    registry.register_by_convention(JsonValueConverter)?;

    // Currency conversion shares the host's rate table
    registry.register_by_convention(CurrencyValueConverter::new(rates.clone()))?;

    Ok(())
}
