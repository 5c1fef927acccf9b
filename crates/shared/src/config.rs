//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Exchange rate configuration.
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `groups.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// Exchange rate provider and cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Base URL of the rate provider.
    #[serde(default = "default_exchange_base_url")]
    pub base_url: String,
    /// Optional provider access key.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Provider call timeout in milliseconds.
    #[serde(default = "default_exchange_timeout_ms")]
    pub timeout_ms: u64,
    /// How long a fetched rate stays valid, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum number of cached currency pairs.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Overrides for the static fallback table. Empty means built-in table.
    #[serde(default)]
    pub fallback_rates: Vec<FallbackRateConfig>,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_exchange_base_url(),
            access_key: None,
            timeout_ms: default_exchange_timeout_ms(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            fallback_rates: Vec::new(),
        }
    }
}

fn default_exchange_base_url() -> String {
    "https://api.exchangerate.host".to_string()
}

fn default_exchange_timeout_ms() -> u64 {
    5000
}

fn default_cache_ttl_secs() -> u64 {
    3600 // 1 hour
}

fn default_cache_capacity() -> u64 {
    1000
}

/// One static fallback rate (1 `from` = `rate` `to`).
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackRateConfig {
    /// Source currency code.
    pub from: String,
    /// Target currency code.
    pub to: String,
    /// Rate.
    pub rate: Decimal,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("POTLUCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
