//! HTTP exchange rate provider.
//!
//! Talks to an exchangerate.host-compatible API:
//! `GET {base_url}/latest?base=USD&symbols=ARS` answering
//! `{"success": true, "rates": {"ARS": 1000.5}}`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use potluck_core::currency::{ProviderError, RateProvider};
use potluck_shared::config::ExchangeConfig;
use potluck_shared::types::CurrencyCode;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

/// Provider ID constant
const PROVIDER_ID: &str = "EXCHANGE_RATE_HOST";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Response body of the `latest` endpoint.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    /// Whether the request was successful. Absent means success.
    #[serde(default = "default_success")]
    success: bool,
    /// Rates for requested symbols (1 base = rate symbol)
    #[serde(default)]
    rates: HashMap<String, f64>,
}

fn default_success() -> bool {
    true
}

/// Live exchange rates over HTTP.
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
    access_key: Option<String>,
}

impl HttpRateProvider {
    /// Creates a provider against `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>, access_key: Option<String>) -> Self {
        Self::with_timeout(base_url, access_key, REQUEST_TIMEOUT)
    }

    /// Creates a provider with an explicit HTTP timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        access_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_key,
        }
    }

    /// Creates a provider from the exchange section of the app config.
    pub fn from_config(config: &ExchangeConfig) -> Self {
        Self::with_timeout(
            config.base_url.clone(),
            config.access_key.clone().filter(|k| !k.is_empty()),
            Duration::from_millis(config.timeout_ms),
        )
    }

    fn latest_url(&self) -> String {
        format!("{}/latest", self.base_url)
    }

    fn query(&self, base: CurrencyCode, symbol: CurrencyCode) -> Vec<(&'static str, String)> {
        let mut query = vec![("base", base.to_string()), ("symbols", symbol.to_string())];
        if let Some(key) = &self.access_key {
            query.push(("access_key", key.clone()));
        }
        query
    }
}

/// Extracts the rate for `symbol` from a parsed response.
fn extract_rate(
    response: &LatestRatesResponse,
    symbol: CurrencyCode,
) -> Result<Decimal, ProviderError> {
    if !response.success {
        return Err(ProviderError::Unsuccessful);
    }

    let raw = response
        .rates
        .get(symbol.as_str())
        .copied()
        .ok_or(ProviderError::MissingRate(symbol))?;

    let rate = Decimal::try_from(raw)
        .map_err(|e| ProviderError::Malformed(format!("rate {raw} for {symbol}: {e}")))?;

    if rate <= Decimal::ZERO {
        return Err(ProviderError::InvalidRate(rate));
    }
    Ok(rate)
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_rate(
        &self,
        base: CurrencyCode,
        symbol: CurrencyCode,
    ) -> Result<Decimal, ProviderError> {
        let response = self
            .client
            .get(self.latest_url())
            .query(&self.query(base, symbol))
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: LatestRatesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let rate = extract_rate(&body, symbol)?;
        debug!(%base, %symbol, %rate, provider = PROVIDER_ID, "Fetched exchange rate");
        Ok(rate)
    }
}
