//! convey-stock - stock value converters for convey pipelines.

pub mod converters;
pub mod register;

pub use converters::collection::{JsonValueConverter, SortValueConverter, TakeValueConverter};
pub use converters::currency::{CurrencyValueConverter, RATES_UPDATED, RateTable};
pub use converters::number::{ClampValueConverter, RoundValueConverter, ScaleValueConverter};
pub use converters::text::{
    LowerValueConverter, PrefixValueConverter, ReplaceValueConverter, UpperValueConverter,
};
pub use register::register_converters;
