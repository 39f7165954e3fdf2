//! Infrastructure layer for fetching, parsing, caching, and configuration
//!
//! This module provides the HTTP page fetcher, HTML parsing, per-shop freshness
//! tracking and caches, plus configuration and logging setup.

pub mod config; // Layered configuration
pub mod freshness;
pub mod http_client;
pub mod logging; // Logging infrastructure
pub mod parsing; // Item card parsing behind the PageParser capability
pub mod parsing_error;
pub mod shop_cache;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError};
pub use freshness::{FreshnessDecision, FreshnessDetector, TimestampSource};
pub use http_client::{FetchError, FetchedPage, HttpPageFetcher, PageFetcher};
pub use logging::{get_log_directory, init_logging_with_config};
pub use parsing::{ItemCardParser, PageParser, ParsingError, ParsingResult};
pub use shop_cache::{ShopCache, ShopCacheEntry};
