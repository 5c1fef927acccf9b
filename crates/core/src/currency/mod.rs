//! Multi-currency handling and exchange rates.
//!
//! The `CurrencyNormalizer` owns a `RateCache`, a `StaticRateTable` of
//! fallback rates and an injectable `RateProvider` and `Clock`.

pub mod cache;
pub mod clock;
pub mod exchange;
pub mod fallback;
pub mod provider;
pub mod service;

#[cfg(test)]
mod props;

pub use cache::RateCache;
pub use clock::{Clock, SystemClock};
pub use exchange::{ExchangeRate, RateSource};
pub use fallback::StaticRateTable;
pub use provider::{ProviderError, RateProvider};
pub use service::{Conversion, CurrencyNormalizer, CurrencyNormalizerBuilder, NormalizedExpenses};
