//! Exchange rate types and logic.

use potluck_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where an exchange rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Same currency on both sides.
    Identity,
    /// Fresh answer from the rate provider.
    Provider,
    /// Provider answer served from the cache.
    Cache,
    /// Static table entry for the same direction.
    StaticTable,
    /// Reciprocal of the static table entry for the reverse direction.
    StaticReciprocal,
    /// Nothing known; 1:1 used as a last resort.
    Unavailable,
}

/// Exchange rate between two currencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    /// Source currency code.
    pub from_currency: CurrencyCode,
    /// Target currency code.
    pub to_currency: CurrencyCode,
    /// Exchange rate (1 from_currency = rate to_currency).
    pub rate: Decimal,
    /// When the rate was obtained (Unix millis).
    pub obtained_at_millis: i64,
    /// Whether the rate is a fallback and results built on it are of degraded accuracy.
    pub is_fallback: bool,
    /// Where the rate came from.
    pub source: RateSource,
}

impl ExchangeRate {
    /// Creates a new exchange rate.
    #[must_use]
    pub const fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        rate: Decimal,
        obtained_at_millis: i64,
        source: RateSource,
    ) -> Self {
        let is_fallback = matches!(
            source,
            RateSource::StaticTable | RateSource::StaticReciprocal | RateSource::Unavailable
        );
        Self {
            from_currency,
            to_currency,
            rate,
            obtained_at_millis,
            is_fallback,
            source,
        }
    }

    /// The exact 1:1 rate of a currency to itself.
    #[must_use]
    pub const fn identity(currency: CurrencyCode, obtained_at_millis: i64) -> Self {
        Self::new(
            currency,
            currency,
            Decimal::ONE,
            obtained_at_millis,
            RateSource::Identity,
        )
    }

    /// Returns the inverse rate.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            from_currency: self.to_currency,
            to_currency: self.from_currency,
            rate: Decimal::ONE / self.rate,
            obtained_at_millis: self.obtained_at_millis,
            is_fallback: self.is_fallback,
            source: self.source,
        }
    }
}
