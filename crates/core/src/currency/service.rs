//! Currency normalization service.
//!
//! Resolution order for a rate `from -> to`:
//! 1. identical currencies: exactly 1, no provider call
//! 2. a fresh cache entry for the ordered pair
//! 3. the live provider, bounded by a timeout (success is cached)
//! 4. the static table, same direction
//! 5. the reciprocal of the static table's reverse direction
//! 6. 1:1, flagged as degraded
//!
//! Steps 4-6 are never cached, so the next call retries the provider.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use potluck_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::cache::RateCache;
use super::clock::{Clock, SystemClock};
use super::exchange::{ExchangeRate, RateSource};
use super::fallback::StaticRateTable;
use super::provider::{ProviderError, RateProvider};
use crate::expense::{Expense, NewExpense};

/// Default provider call timeout.
const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cache capacity (number of currency pairs).
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default cache time-to-live (1 hour).
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// An amount converted into another currency, with the rate used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Converted amount. Unrounded.
    pub amount: Decimal,
    /// The rate the conversion used.
    pub rate: ExchangeRate,
}

impl Conversion {
    /// Whether the conversion used a fallback or 1:1 rate.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.rate.is_fallback
    }
}

/// A batch of expenses normalized into one base currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedExpenses {
    /// Normalized expenses, in input order.
    pub expenses: Vec<Expense>,
    /// Whether any expense used a fallback or 1:1 rate.
    pub degraded: bool,
}

/// Converts amounts between currencies using a live provider, a cache, and
/// a static fallback table.
#[derive(Clone)]
pub struct CurrencyNormalizer {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    fallback: StaticRateTable,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl CurrencyNormalizer {
    /// Creates a normalizer with default settings around the given provider.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self::builder(provider).build()
    }

    /// Starts building a normalizer around the given provider.
    #[must_use]
    pub fn builder(provider: Arc<dyn RateProvider>) -> CurrencyNormalizerBuilder {
        CurrencyNormalizerBuilder {
            provider,
            clock: Arc::new(SystemClock),
            fallback: StaticRateTable::default(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// The rate cache owned by this normalizer.
    #[must_use]
    pub fn cache(&self) -> &RateCache {
        &self.cache
    }

    /// Resolves the rate for converting `from` into `to`.
    ///
    /// Never fails: provider problems fall back to the static table and
    /// finally to 1:1, with `is_fallback` set.
    pub async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> ExchangeRate {
        if from == to {
            return ExchangeRate::identity(from, self.clock.now_millis());
        }

        if let Some(cached) = self.cache.get(from, to) {
            debug!(%from, %to, rate = %cached.rate, "Exchange rate cache hit");
            return cached;
        }

        debug!(%from, %to, provider = self.provider.id(), "Exchange rate cache miss");

        match self.fetch(from, to).await {
            Ok(rate) => {
                let fresh = ExchangeRate::new(
                    from,
                    to,
                    rate,
                    self.clock.now_millis(),
                    RateSource::Provider,
                );
                self.cache.insert(fresh.clone());
                fresh
            }
            Err(err) => {
                warn!(
                    %from,
                    %to,
                    provider = self.provider.id(),
                    error = %err,
                    "Exchange rate provider failed, using fallback"
                );
                self.fallback_rate(from, to)
            }
        }
    }

    /// Converts `amount` from one currency into another.
    ///
    /// No rounding is applied; rounding belongs to whoever reports the result.
    pub async fn convert(&self, amount: Decimal, from: CurrencyCode, to: CurrencyCode) -> Conversion {
        let rate = self.rate(from, to).await;
        Self::apply_rate(amount, rate)
    }

    /// Normalizes a single expense into the group's base currency.
    pub async fn normalize(&self, expense: NewExpense, base: CurrencyCode) -> Expense {
        let conversion = self.convert(expense.amount, expense.currency, base).await;
        let degraded = conversion.is_degraded();
        Expense::from_new(expense, base, conversion.amount, degraded)
    }

    /// Normalizes a batch of expenses into the group's base currency.
    ///
    /// Each currency pair is resolved once per batch, so every expense in the
    /// same currency is converted with the same rate snapshot.
    pub async fn normalize_all(
        &self,
        base: CurrencyCode,
        expenses: Vec<NewExpense>,
    ) -> NormalizedExpenses {
        let mut snapshot: HashMap<CurrencyCode, ExchangeRate> = HashMap::new();
        let mut normalized = Vec::with_capacity(expenses.len());
        let mut degraded = false;

        for expense in expenses {
            let rate = match snapshot.get(&expense.currency) {
                Some(rate) => rate.clone(),
                None => {
                    let rate = self.rate(expense.currency, base).await;
                    snapshot.insert(expense.currency, rate.clone());
                    rate
                }
            };

            let conversion = Self::apply_rate(expense.amount, rate);
            let is_degraded = conversion.is_degraded();
            degraded |= is_degraded;
            normalized.push(Expense::from_new(expense, base, conversion.amount, is_degraded));
        }

        if degraded {
            warn!(%base, "Some expenses were normalized with fallback rates");
        }

        NormalizedExpenses {
            expenses: normalized,
            degraded,
        }
    }

    /// Multiplies `amount` by `rate`.
    ///
    /// A product that does not fit in a `Decimal` keeps the source amount and
    /// reports an unavailable 1:1 rate instead.
    fn apply_rate(amount: Decimal, rate: ExchangeRate) -> Conversion {
        if rate.source == RateSource::Identity {
            return Conversion { amount, rate };
        }

        match amount.checked_mul(rate.rate) {
            Some(converted) => Conversion {
                amount: converted,
                rate,
            },
            None => {
                warn!(
                    from = %rate.from_currency,
                    to = %rate.to_currency,
                    %amount,
                    rate = %rate.rate,
                    "Converted amount overflows, converting 1:1"
                );
                let unavailable = ExchangeRate::new(
                    rate.from_currency,
                    rate.to_currency,
                    Decimal::ONE,
                    rate.obtained_at_millis,
                    RateSource::Unavailable,
                );
                Conversion {
                    amount,
                    rate: unavailable,
                }
            }
        }
    }

    async fn fetch(&self, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal, ProviderError> {
        let rate = tokio::time::timeout(self.timeout, self.provider.fetch_rate(from, to))
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))??;

        if rate <= Decimal::ZERO {
            return Err(ProviderError::InvalidRate(rate));
        }
        Ok(rate)
    }

    fn fallback_rate(&self, from: CurrencyCode, to: CurrencyCode) -> ExchangeRate {
        let now = self.clock.now_millis();
        match self.fallback.lookup(from, to) {
            Some((rate, source)) => ExchangeRate::new(from, to, rate, now, source),
            None => {
                warn!(%from, %to, "No fallback rate known, converting 1:1");
                ExchangeRate::new(from, to, Decimal::ONE, now, RateSource::Unavailable)
            }
        }
    }
}

/// Builder for [`CurrencyNormalizer`].
pub struct CurrencyNormalizerBuilder {
    provider: Arc<dyn RateProvider>,
    clock: Arc<dyn Clock>,
    fallback: StaticRateTable,
    timeout: Duration,
    cache_capacity: u64,
    cache_ttl: Duration,
}

impl CurrencyNormalizerBuilder {
    /// Uses the given time source for cache staleness and rate timestamps.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the built-in fallback table.
    #[must_use]
    pub fn fallback_table(mut self, fallback: StaticRateTable) -> Self {
        self.fallback = fallback;
        self
    }

    /// Sets the provider call timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of cached currency pairs.
    #[must_use]
    pub fn cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Sets how long a provider rate stays cached.
    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Builds the normalizer.
    #[must_use]
    pub fn build(self) -> CurrencyNormalizer {
        let cache = RateCache::with_config(self.clock.clone(), self.cache_capacity, self.cache_ttl);
        CurrencyNormalizer {
            provider: self.provider,
            cache,
            fallback: self.fallback,
            clock: self.clock,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use potluck_shared::types::{ExpenseId, MemberId};
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    struct ManualClock(AtomicI64);

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Provider answering from a fixed script, counting calls.
    struct ScriptedProvider {
        answers: Mutex<HashMap<(CurrencyCode, CurrencyCode), Decimal>>,
        fail: std::sync::atomic::AtomicBool,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(answers: &[(&str, &str, Decimal)]) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(
                    answers
                        .iter()
                        .map(|(from, to, rate)| ((code(from), code(to)), *rate))
                        .collect(),
                ),
                fail: std::sync::atomic::AtomicBool::new(false),
                calls: AtomicUsize::new(0),
            })
        }

        fn unreachable() -> Arc<Self> {
            let provider = Self::new(&[]);
            provider.fail.store(true, Ordering::SeqCst);
            provider
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for ScriptedProvider {
        fn id(&self) -> &'static str {
            "SCRIPTED"
        }

        async fn fetch_rate(
            &self,
            base: CurrencyCode,
            symbol: CurrencyCode,
        ) -> Result<Decimal, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ProviderError::Network("connection refused".into()));
            }
            self.answers
                .lock()
                .unwrap()
                .get(&(base, symbol))
                .copied()
                .ok_or(ProviderError::MissingRate(symbol))
        }
    }

    /// Provider that never answers.
    struct HangingProvider;

    #[async_trait]
    impl RateProvider for HangingProvider {
        fn id(&self) -> &'static str {
            "HANGING"
        }

        async fn fetch_rate(
            &self,
            _base: CurrencyCode,
            _symbol: CurrencyCode,
        ) -> Result<Decimal, ProviderError> {
            std::future::pending().await
        }
    }

    fn normalizer(provider: Arc<dyn RateProvider>, clock: Arc<ManualClock>) -> CurrencyNormalizer {
        CurrencyNormalizer::builder(provider)
            .clock(clock)
            .cache_ttl(Duration::from_secs(3600))
            .build()
    }

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock(AtomicI64::new(1_700_000_000_000)))
    }

    fn new_expense(id: &str, amount: Decimal, currency: &str) -> NewExpense {
        NewExpense {
            id: ExpenseId::from(id),
            payer_id: MemberId::from("a"),
            amount,
            currency: code(currency),
            participant_ids: [MemberId::from("a")].into_iter().collect(),
            category: None,
            description: None,
            timestamp_millis: None,
            created_at_millis: 0,
        }
    }

    #[tokio::test]
    async fn test_same_currency_skips_provider() {
        let provider = ScriptedProvider::unreachable();
        let service = normalizer(provider.clone(), clock());

        let rate = service.rate(code("USD"), code("USD")).await;
        assert_eq!(rate.rate, Decimal::ONE);
        assert_eq!(rate.source, RateSource::Identity);
        assert!(!rate.is_fallback);

        let conversion = service.convert(dec!(123.456), code("USD"), code("USD")).await;
        assert_eq!(conversion.amount, dec!(123.456));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_rate_is_cached() {
        let provider = ScriptedProvider::new(&[("USD", "ARS", dec!(1000))]);
        let service = normalizer(provider.clone(), clock());

        let first = service.rate(code("USD"), code("ARS")).await;
        assert_eq!(first.rate, dec!(1000));
        assert_eq!(first.source, RateSource::Provider);

        let second = service.rate(code("USD"), code("ARS")).await;
        assert_eq!(second.rate, dec!(1000));
        assert_eq!(second.source, RateSource::Cache);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_queries_provider_again() {
        let provider = ScriptedProvider::new(&[("USD", "ARS", dec!(1000))]);
        let clock = clock();
        let service = normalizer(provider.clone(), clock.clone());

        service.rate(code("USD"), code("ARS")).await;
        clock.0.fetch_add(3_600_000, Ordering::SeqCst);
        let rate = service.rate(code("USD"), code("ARS")).await;

        assert_eq!(rate.source, RateSource::Provider);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_reverse_pair_is_a_separate_entry() {
        let provider =
            ScriptedProvider::new(&[("USD", "ARS", dec!(1000)), ("ARS", "USD", dec!(0.0011))]);
        let service = normalizer(provider.clone(), clock());

        service.rate(code("USD"), code("ARS")).await;
        let reverse = service.rate(code("ARS"), code("USD")).await;

        assert_eq!(reverse.rate, dec!(0.0011));
        assert_eq!(reverse.source, RateSource::Provider);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_fallback_same_direction() {
        let service = normalizer(ScriptedProvider::unreachable(), clock());

        let rate = service.rate(code("USD"), code("ARS")).await;
        assert_eq!(rate.rate, dec!(1000));
        assert_eq!(rate.source, RateSource::StaticTable);
        assert!(rate.is_fallback);
    }

    #[tokio::test]
    async fn test_fallback_reciprocal() {
        let service = normalizer(ScriptedProvider::unreachable(), clock());

        let rate = service.rate(code("ARS"), code("USD")).await;
        assert_eq!(rate.rate, dec!(0.001));
        assert_eq!(rate.source, RateSource::StaticReciprocal);
        assert!(rate.is_fallback);
    }

    #[tokio::test]
    async fn test_unknown_pair_converts_one_to_one_degraded() {
        let service = normalizer(ScriptedProvider::unreachable(), clock());

        let conversion = service.convert(dec!(5000), code("JPY"), code("COP")).await;
        assert_eq!(conversion.amount, dec!(5000));
        assert_eq!(conversion.rate.source, RateSource::Unavailable);
        assert!(conversion.is_degraded());
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let provider = ScriptedProvider::unreachable();
        let service = normalizer(provider.clone(), clock());

        service.rate(code("USD"), code("ARS")).await;
        service.rate(code("USD"), code("ARS")).await;

        assert_eq!(provider.calls(), 2);
        service.cache().run_pending_tasks();
        assert_eq!(service.cache().entry_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_symbol_falls_back() {
        let provider = ScriptedProvider::new(&[("USD", "EUR", dec!(0.9))]);
        let service = normalizer(provider, clock());

        let rate = service.rate(code("USD"), code("ARS")).await;
        assert_eq!(rate.source, RateSource::StaticTable);
    }

    #[tokio::test]
    async fn test_non_positive_provider_rate_falls_back() {
        let provider = ScriptedProvider::new(&[("USD", "ARS", dec!(0))]);
        let service = normalizer(provider, clock());

        let rate = service.rate(code("USD"), code("ARS")).await;
        assert_eq!(rate.rate, dec!(1000));
        assert!(rate.is_fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_timeout_falls_back() {
        let service = CurrencyNormalizer::builder(Arc::new(HangingProvider))
            .timeout(Duration::from_millis(50))
            .fallback_table(StaticRateTable::empty())
            .build();

        let rate = service.rate(code("EUR"), code("USD")).await;
        assert_eq!(rate.rate, Decimal::ONE);
        assert_eq!(rate.source, RateSource::Unavailable);
    }

    #[tokio::test]
    async fn test_convert_does_not_round() {
        let provider = ScriptedProvider::new(&[("EUR", "USD", dec!(1.0837))]);
        let service = normalizer(provider, clock());

        let conversion = service.convert(dec!(10.015), code("EUR"), code("USD")).await;
        assert_eq!(conversion.amount, dec!(10.8532555));
    }

    #[tokio::test]
    async fn test_normalize_all_uses_one_snapshot_per_pair() {
        let provider = ScriptedProvider::new(&[("EUR", "USD", dec!(1.1))]);
        let service = normalizer(provider.clone(), clock());

        let result = service
            .normalize_all(
                code("USD"),
                vec![
                    new_expense("e1", dec!(10), "EUR"),
                    new_expense("e2", dec!(20), "USD"),
                    new_expense("e3", dec!(30), "EUR"),
                ],
            )
            .await;

        assert!(!result.degraded);
        let amounts: Vec<Decimal> = result.expenses.iter().map(|e| e.normalized_amount).collect();
        assert_eq!(amounts, vec![dec!(11.0), dec!(20), dec!(33.0)]);
        assert!(result.expenses.iter().all(|e| e.group_base_currency == code("USD")));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_normalize_all_flags_degraded() {
        let service = normalizer(ScriptedProvider::unreachable(), clock());

        let result = service
            .normalize_all(
                code("USD"),
                vec![
                    new_expense("e1", dec!(10), "USD"),
                    new_expense("e2", dec!(1000), "ARS"),
                ],
            )
            .await;

        assert!(result.degraded);
        assert!(!result.expenses[0].degraded);
        assert!(result.expenses[1].degraded);
        assert_eq!(result.expenses[1].normalized_amount, dec!(1));
    }

    #[tokio::test]
    async fn test_normalize_single() {
        let provider = ScriptedProvider::new(&[("USD", "EUR", dec!(0.5))]);
        let service = normalizer(provider, clock());

        let expense = service
            .normalize(new_expense("e1", dec!(40), "USD"), code("EUR"))
            .await;
        assert_eq!(expense.normalized_amount, dec!(20.0));
        assert_eq!(expense.amount, dec!(40));
        assert_eq!(expense.group_base_currency, code("EUR"));
        assert!(!expense.degraded);
    }

    #[tokio::test]
    async fn test_overflowing_conversion_degrades_to_one_to_one() {
        let provider = ScriptedProvider::new(&[("USD", "ARS", dec!(1000))]);
        let service = normalizer(provider, clock());

        let conversion = service
            .convert(Decimal::MAX, code("USD"), code("ARS"))
            .await;

        assert_eq!(conversion.amount, Decimal::MAX);
        assert_eq!(conversion.rate.source, RateSource::Unavailable);
        assert!(conversion.is_degraded());
    }

    #[tokio::test]
    async fn test_normalize_all_survives_overflow() {
        let provider = ScriptedProvider::new(&[("ARS", "USD", dec!(2))]);
        let service = normalizer(provider, clock());

        let result = service
            .normalize_all(
                code("USD"),
                vec![
                    new_expense("e1", Decimal::MAX, "ARS"),
                    new_expense("e2", dec!(10), "ARS"),
                ],
            )
            .await;

        assert!(result.degraded);
        assert!(result.expenses[0].degraded);
        assert_eq!(result.expenses[0].normalized_amount, Decimal::MAX);
        assert!(!result.expenses[1].degraded);
        assert_eq!(result.expenses[1].normalized_amount, dec!(20));
    }
}
