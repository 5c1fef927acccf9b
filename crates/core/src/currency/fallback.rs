//! Static fallback exchange rates.
//!
//! Used only when the live provider fails. Lookups try the same direction
//! first, then the reciprocal of the reverse direction.

use std::collections::HashMap;

use potluck_shared::types::CurrencyCode;
use rust_decimal::Decimal;

use super::exchange::RateSource;

/// Built-in table: (from, to, rate) with 1 `from` = `rate` `to`.
const DEFAULT_RATES: &[(&str, &str, i64, u32)] = &[
    ("USD", "ARS", 1000, 0),
    ("USD", "EUR", 92, 2),
    ("USD", "GBP", 79, 2),
    ("USD", "BRL", 500, 2),
    ("USD", "MXN", 1700, 2),
    ("USD", "CLP", 900, 0),
    ("USD", "JPY", 150, 0),
    ("EUR", "ARS", 1080, 0),
    ("EUR", "GBP", 86, 2),
];

/// A static table of known rate pairs.
#[derive(Debug, Clone)]
pub struct StaticRateTable {
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl StaticRateTable {
    /// Creates an empty table (every failed lookup degrades to 1:1).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// Creates a table from explicit entries.
    ///
    /// Non-positive rates are skipped since their reciprocal is undefined.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CurrencyCode, CurrencyCode, Decimal)>,
    {
        let rates = entries
            .into_iter()
            .filter(|(_, _, rate)| *rate > Decimal::ZERO)
            .map(|(from, to, rate)| ((from, to), rate))
            .collect();
        Self { rates }
    }

    /// Looks up a fallback rate for the ordered pair.
    ///
    /// Returns `None` when neither direction is known.
    #[must_use]
    pub fn lookup(&self, from: CurrencyCode, to: CurrencyCode) -> Option<(Decimal, RateSource)> {
        if let Some(rate) = self.rates.get(&(from, to)) {
            return Some((*rate, RateSource::StaticTable));
        }
        self.rates
            .get(&(to, from))
            .map(|reverse| (Decimal::ONE / *reverse, RateSource::StaticReciprocal))
    }

    /// Number of pairs in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the table has no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for StaticRateTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_RATES.iter().filter_map(|(from, to, num, scale)| {
            Some((from.parse().ok()?, to.parse().ok()?, Decimal::new(*num, *scale)))
        }))
    }
}
