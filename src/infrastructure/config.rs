//! Configuration infrastructure
//!
//! Layered application configuration built with the `config` crate:
//! 1. Built-in defaults (`AppConfig::default()`)
//! 2. `config/default.*` next to the working directory (optional)
//! 3. The user file under the platform config directory (optional)
//! 4. `BOOTH_SHOWCASE__*` environment variables (`__` separates sections)

#![allow(clippy::derivable_impls)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::Shop;
use crate::domain::constants::{crawling, site};
use crate::infrastructure::parsing::ItemCardSelectors;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,

    /// Shops to scrape, in response order
    pub shops: Vec<ShopConfig>,

    pub http: HttpConfig,

    pub cache: CacheConfig,

    pub cron: CronConfig,

    pub logging: LoggingConfig,

    /// Item card selectors, each a fallback list
    pub parsing: ItemCardSelectors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the JSON API binds to (host:port)
    pub bind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    pub name: String,
    pub url: String,
}

/// Settings for the listing page fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub referer: String,

    /// Per-request deadline in seconds
    pub timeout_seconds: u64,

    /// Requests per second across all shops, 0 disables the limiter
    pub max_requests_per_second: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long the combined item list is served without re-scraping
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CronConfig {
    /// Shared secret for the scheduled refresh endpoint; unset rejects every trigger
    pub token: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output (daily rotated)
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub directory: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            shops: site::DEFAULT_SHOPS
                .iter()
                .map(|(name, url)| ShopConfig {
                    name: (*name).to_string(),
                    url: (*url).to_string(),
                })
                .collect(),
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
            cron: CronConfig::default(),
            logging: LoggingConfig::default(),
            parsing: ItemCardSelectors::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8".to_string(),
            accept_language: "ja,en-US;q=0.7,en;q=0.3".to_string(),
            referer: site::REFERER.to_string(),
            timeout_seconds: crawling::DEFAULT_REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: crawling::DEFAULT_MAX_REQUESTS_PER_SECOND,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: crawling::ttl::AGGREGATE_CACHE_TTL_MINUTES,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            directory: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

impl CronConfig {
    /// Exact match against the configured secret; always false when unset.
    pub fn authorize(&self, presented: Option<&str>) -> bool {
        match (self.token.as_deref(), presented) {
            (Some(expected), Some(given)) => !expected.is_empty() && expected == given,
            _ => false,
        }
    }
}

impl AppConfig {
    pub const ENV_PREFIX: &'static str = "BOOTH_SHOWCASE";

    /// Get the user configuration directory
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("booth-showcase"))
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        let user_file = Self::user_config_dir().map(|dir| dir.join("config"));
        Self::load_from(user_file.as_deref())
    }

    /// Load configuration with an explicit extra file layered over `config/default`
    pub fn load_from(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name("config/default").required(false));

        if let Some(path) = extra_file {
            info!("Layering configuration file: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shops.is_empty() {
            return Err(ConfigError::Validation {
                message: "at least one shop must be configured".to_string(),
            });
        }

        for shop in &self.shops {
            let derived = Shop::from_url(&shop.url).map_err(|e| ConfigError::Validation {
                message: e.to_string(),
            })?;
            if derived.name != shop.name {
                warn!(
                    "Shop '{}' is served under '{}' (derived from its URL host)",
                    shop.name, derived.name
                );
            }
        }

        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "http.timeout_seconds must be greater than 0".to_string(),
            });
        }

        if self.cache.ttl_minutes == 0 {
            warn!("cache.ttl_minutes is 0, every request will re-scrape all shops");
        }

        if self.cron.token.is_none() {
            warn!("cron.token is not set, scheduled refresh requests will be rejected");
        }

        Ok(())
    }

    /// Listing URLs in configured order
    pub fn shop_urls(&self) -> Vec<String> {
        self.shops.iter().map(|shop| shop.url.clone()).collect()
    }
}
