//! Application state shared by the HTTP handlers
//!
//! Owns every cache for the lifetime of the server; tests build a fresh state
//! per case with injected fetchers and parsers.

use std::sync::Arc;

use tracing::info;

use crate::application::aggregate_cache::AggregateCache;
use crate::application::error::GalleryError;
use crate::application::shop_orchestrator::ShopOrchestrator;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::parsing::RandomIdStrategy;
use crate::infrastructure::{
    FreshnessDetector, HttpPageFetcher, ItemCardParser, PageFetcher, PageParser, ShopCache,
};

#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    pub items: Arc<AggregateCache>,
}

impl AppState {
    /// Wire the production fetcher and parser from configuration
    pub fn from_config(config: AppConfig) -> Result<Self, GalleryError> {
        let fetcher = HttpPageFetcher::new(config.http.clone())?;
        let parser = ItemCardParser::with_config(&config.parsing, Arc::new(RandomIdStrategy))?;
        Ok(Self::with_components(config, Arc::new(fetcher), Arc::new(parser)))
    }

    pub fn with_components(
        config: AppConfig,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
    ) -> Self {
        let orchestrator = ShopOrchestrator::new(
            fetcher,
            parser,
            Arc::new(FreshnessDetector::new()),
            Arc::new(ShopCache::new()),
        );
        let items = AggregateCache::new(orchestrator, config.shop_urls(), config.cache.ttl());

        info!(
            "Application state ready: {} shops, cache TTL {:?}",
            config.shops.len(),
            config.cache.ttl()
        );

        Self {
            config: Arc::new(config),
            items: Arc::new(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ParsingError;

    #[test]
    fn test_from_config_builds_state() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        assert_eq!(state.config.shops.len(), 3);
    }

    #[test]
    fn test_from_config_uses_configured_selectors() {
        let mut config = AppConfig::default();
        config.parsing.price = vec!["[[".to_string()];

        let result = AppState::from_config(config);
        assert!(matches!(
            result,
            Err(GalleryError::Parser(ParsingError::InvalidSelector { .. }))
        ));
    }
}
