//! Potluck API Server
//!
//! Main entry point for the Potluck backend service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use potluck_api::{AppState, create_router};
use potluck_core::currency::{CurrencyNormalizer, StaticRateTable};
use potluck_rates::HttpRateProvider;
use potluck_shared::AppConfig;
use potluck_shared::config::ExchangeConfig;
use potluck_shared::types::CurrencyCode;
use potluck_store::JsonStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "potluck=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Open store
    let store = JsonStore::new(&config.storage.data_dir);
    info!(path = %store.path().display(), "Using group store");

    // Create currency normalizer
    let provider = HttpRateProvider::from_config(&config.exchange);
    let normalizer = CurrencyNormalizer::builder(Arc::new(provider))
        .fallback_table(fallback_table(&config.exchange))
        .timeout(Duration::from_millis(config.exchange.timeout_ms))
        .cache_ttl(Duration::from_secs(config.exchange.cache_ttl_secs))
        .cache_capacity(config.exchange.cache_capacity)
        .build();
    info!(
        base_url = %config.exchange.base_url,
        cache_ttl_secs = config.exchange.cache_ttl_secs,
        "Exchange rate provider configured"
    );

    // Create application state
    let state = AppState {
        store: Arc::new(store),
        normalizer: Arc::new(normalizer),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the fallback table from config, or the built-in one when none is configured.
fn fallback_table(config: &ExchangeConfig) -> StaticRateTable {
    if config.fallback_rates.is_empty() {
        return StaticRateTable::default();
    }

    let entries = config.fallback_rates.iter().filter_map(|entry| {
        match (
            entry.from.parse::<CurrencyCode>(),
            entry.to.parse::<CurrencyCode>(),
        ) {
            (Ok(from), Ok(to)) => Some((from, to, entry.rate)),
            _ => {
                warn!(from = %entry.from, to = %entry.to, "Skipping invalid fallback rate");
                None
            }
        }
    });

    let table = StaticRateTable::from_entries(entries);
    info!(pairs = table.len(), "Loaded fallback rates from config");
    table
}
