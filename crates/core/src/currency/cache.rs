//! Exchange rate caching using Moka.
//!
//! Entries are keyed by the ordered pair `(from, to)`, since providers
//! answer per direction. Staleness is judged against the injected `Clock`
//! rather than Moka's own timer so tests can move time explicitly.

use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use potluck_shared::types::CurrencyCode;
use tracing::debug;

use super::clock::Clock;
use super::exchange::{ExchangeRate, RateSource};

/// Default cache capacity (number of currency pairs).
const DEFAULT_CACHE_CAPACITY: u64 = 1000;

/// Default time-to-live for cache entries (1 hour).
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache of provider rates. Thread-safe, last writer wins.
#[derive(Clone)]
pub struct RateCache {
    cache: Cache<(CurrencyCode, CurrencyCode), ExchangeRate>,
    ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    /// Creates a rate cache with default settings.
    ///
    /// Default: 1000 pairs max, 1 hour TTL.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, DEFAULT_CACHE_CAPACITY, DEFAULT_TTL)
    }

    /// Creates a rate cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `clock` - Time source used to judge staleness
    /// * `max_capacity` - Maximum number of currency pairs to cache
    /// * `ttl` - How long a fetched rate stays valid
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);

        Self {
            cache,
            ttl_millis,
            clock,
        }
    }

    /// Returns the cached rate for the pair if it is still fresh.
    ///
    /// Expired entries are evicted and reported as absent. The returned rate
    /// keeps its original `obtained_at_millis` and is tagged `RateSource::Cache`.
    #[must_use]
    pub fn get(&self, from: CurrencyCode, to: CurrencyCode) -> Option<ExchangeRate> {
        let key = (from, to);
        let cached = self.cache.get(&key)?;

        let age = self.clock.now_millis().saturating_sub(cached.obtained_at_millis);
        if age >= self.ttl_millis {
            debug!(%from, %to, age_ms = age, "Cached rate expired");
            self.cache.invalidate(&key);
            return None;
        }

        Some(ExchangeRate {
            source: RateSource::Cache,
            ..cached
        })
    }

    /// Stores a rate under its ordered pair, replacing any previous entry.
    pub fn insert(&self, rate: ExchangeRate) {
        self.cache
            .insert((rate.from_currency, rate.to_currency), rate);
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka applies evictions lazily; calling this makes `entry_count`
    /// accurate immediately.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}
