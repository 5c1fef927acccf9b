//! Rate provider port.

use async_trait::async_trait;
use potluck_shared::types::CurrencyCode;
use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

/// Ways a rate provider call can fail.
///
/// None of these reach callers of the normalizer; every variant triggers the
/// fallback chain.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Could not reach the provider.
    #[error("Rate provider unreachable: {0}")]
    Network(String),

    /// Provider answered with a non-success HTTP status.
    #[error("Rate provider returned status {0}")]
    Status(u16),

    /// Provider answered with a body we could not parse.
    #[error("Malformed rate provider response: {0}")]
    Malformed(String),

    /// Provider answered `success: false`.
    #[error("Rate provider reported failure")]
    Unsuccessful,

    /// Provider answered but without the requested symbol.
    #[error("Rate provider response has no rate for {0}")]
    MissingRate(CurrencyCode),

    /// Provider returned zero or a negative rate.
    #[error("Rate provider returned a non-positive rate: {0}")]
    InvalidRate(Decimal),

    /// Provider did not answer in time.
    #[error("Rate provider timed out after {0:?}")]
    Timeout(Duration),
}

/// A live source of exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Identifier used in logs.
    fn id(&self) -> &'static str;

    /// Fetches how many `symbol` one unit of `base` buys.
    async fn fetch_rate(
        &self,
        base: CurrencyCode,
        symbol: CurrencyCode,
    ) -> Result<Decimal, ProviderError>;
}
