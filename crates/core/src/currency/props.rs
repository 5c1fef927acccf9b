//! Property-based tests for currency operations.
//!
//! - Currency identity: converting into the same currency returns the amount
//! - Reciprocal fallback: reverse-direction lookups invert the table entry
//! - Conversion is linear in the amount for a fixed rate snapshot

use std::sync::Arc;

use async_trait::async_trait;
use potluck_shared::types::CurrencyCode;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::fallback::StaticRateTable;
use super::provider::{ProviderError, RateProvider};
use super::service::CurrencyNormalizer;

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive exchange rates (0.0001 to 10000.0000).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Strategy to generate 3-letter currency codes.
fn currency_code() -> impl Strategy<Value = CurrencyCode> {
    "[A-Z]{3}".prop_map(|s| s.parse().unwrap())
}

/// Provider that always answers with the same rate.
struct FixedProvider(Decimal);

#[async_trait]
impl RateProvider for FixedProvider {
    fn id(&self) -> &'static str {
        "FIXED"
    }

    async fn fetch_rate(
        &self,
        _base: CurrencyCode,
        _symbol: CurrencyCode,
    ) -> Result<Decimal, ProviderError> {
        Ok(self.0)
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* amount and currency X, convert(amount, X, X) SHALL equal amount.
    #[test]
    fn prop_same_currency_preserves_amount(
        amount in positive_amount(),
        currency in currency_code(),
        rate in positive_rate(),
    ) {
        let service = CurrencyNormalizer::new(Arc::new(FixedProvider(rate)));
        let conversion = block_on(service.convert(amount, currency, currency));
        prop_assert_eq!(conversion.amount, amount);
        prop_assert!(!conversion.is_degraded());
    }

    /// *For any* provider rate, convert SHALL return amount * rate unrounded.
    #[test]
    fn prop_convert_multiplies_by_rate(
        amount in positive_amount(),
        rate in positive_rate(),
    ) {
        let service = CurrencyNormalizer::new(Arc::new(FixedProvider(rate)));
        let conversion = block_on(service.convert(amount, CurrencyCode::EUR, CurrencyCode::USD));
        prop_assert_eq!(conversion.amount, amount * rate);
        prop_assert_eq!(conversion.rate.rate, rate);
    }

    /// *For any* static entry, the reverse lookup SHALL be its reciprocal.
    #[test]
    fn prop_reverse_lookup_is_reciprocal(
        from in currency_code(),
        to in currency_code(),
        rate in positive_rate(),
    ) {
        prop_assume!(from != to);
        let table = StaticRateTable::from_entries([(from, to, rate)]);
        let (reverse, _) = table.lookup(to, from).unwrap();
        prop_assert_eq!(reverse, Decimal::ONE / rate);
    }
}
