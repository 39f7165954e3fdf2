//! Fetch, freshness check and parse for every configured shop
//!
//! One task per shop, joined positionally so the combined list keeps the
//! configured shop order no matter which fetch finishes first. A failure in one
//! shop only ever replaces that shop's items with its fallback entries.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::application::error::GalleryError;
use crate::domain::{Item, Shop, fallback_catalog};
use crate::infrastructure::http_client::ensure_not_challenge;
use crate::infrastructure::{FreshnessDetector, PageFetcher, PageParser, ShopCache};

/// Where a shop's items came from on this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// Freshly parsed from the live page
    Live,
    /// Page unchanged since the last parse
    ShopCache,
    /// Fetch, challenge or parse failure
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopOutcome {
    pub shop: String,
    pub items: Vec<Item>,
    pub source: ItemSource,
}

impl ShopOutcome {
    fn fallback(shop: &Shop) -> Self {
        Self {
            shop: shop.name.clone(),
            items: fallback_catalog::for_shop(&shop.name),
            source: ItemSource::Fallback,
        }
    }

    /// Only a live parse with at least one item counts as an update.
    pub fn is_updated(&self) -> bool {
        self.source == ItemSource::Live
    }
}

/// Combined result of one orchestrator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOutcome {
    pub items: Vec<Item>,
    pub updated_shops: Vec<String>,
}

impl OrchestratorOutcome {
    /// Concatenate in shop order. An empty total becomes the whole fallback catalog.
    pub fn from_shop_outcomes(outcomes: Vec<ShopOutcome>) -> Self {
        let updated_shops: Vec<String> = outcomes
            .iter()
            .filter(|outcome| outcome.is_updated())
            .map(|outcome| outcome.shop.clone())
            .collect();
        let items: Vec<Item> = outcomes
            .into_iter()
            .flat_map(|outcome| outcome.items)
            .collect();

        if items.is_empty() {
            warn!("⚠️ Every shop came back empty, serving the full fallback catalog");
            return Self {
                items: fallback_catalog::all().to_vec(),
                updated_shops: Vec::new(),
            };
        }

        Self {
            items,
            updated_shops,
        }
    }
}

#[derive(Clone)]
pub struct ShopOrchestrator {
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn PageParser>,
    freshness: Arc<FreshnessDetector>,
    shop_cache: Arc<ShopCache>,
}

impl ShopOrchestrator {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
        freshness: Arc<FreshnessDetector>,
        shop_cache: Arc<ShopCache>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            freshness,
            shop_cache,
        }
    }

    pub fn freshness(&self) -> &Arc<FreshnessDetector> {
        &self.freshness
    }

    /// Run every shop concurrently. Only a malformed shop URL fails the whole run.
    pub async fn scrape_all(&self, shop_urls: &[String]) -> Result<OrchestratorOutcome, GalleryError> {
        let shops = shop_urls
            .iter()
            .map(|url| Shop::from_url(url))
            .collect::<Result<Vec<_>, _>>()?;

        info!("🚀 Scraping {} shops", shops.len());

        let tasks: Vec<_> = shops
            .iter()
            .cloned()
            .map(|shop| {
                let orchestrator = self.clone();
                tokio::spawn(async move { orchestrator.scrape_shop(&shop).await })
            })
            .collect();

        let results = join_all(tasks).await;

        let mut outcomes = Vec::with_capacity(shops.len());
        for (shop, result) in shops.iter().zip(results) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_error) => {
                    error!("❌ Scrape task for {} failed: {}", shop.name, join_error);
                    outcomes.push(ShopOutcome::fallback(shop));
                }
            }
        }

        let outcome = OrchestratorOutcome::from_shop_outcomes(outcomes);
        info!(
            "🎯 Scrape completed: {} items, updated shops {:?}",
            outcome.items.len(),
            outcome.updated_shops
        );
        Ok(outcome)
    }

    /// Fetch -> challenge check -> freshness -> parse for a single shop.
    pub async fn scrape_shop(&self, shop: &Shop) -> ShopOutcome {
        let page = match self
            .fetcher
            .fetch(&shop.url)
            .await
            .and_then(|page| ensure_not_challenge(&shop.url, page))
        {
            Ok(page) => page,
            Err(e) => {
                warn!("❌ {}: {}, using fallback items", shop.name, e);
                return ShopOutcome::fallback(shop);
            }
        };

        let embedded = self.parser.shop_updated_at(&page.body);
        let decision = self
            .freshness
            .assess(&shop.url, page.last_modified.as_deref(), embedded.as_deref())
            .await;

        if !decision.is_updated {
            if let Some(cached) = self.shop_cache.get(&shop.name).await {
                debug!("{} unchanged since {:?}, serving cached items", shop.name, decision.previous);
                return ShopOutcome {
                    shop: shop.name.clone(),
                    items: cached.as_ref().clone(),
                    source: ItemSource::ShopCache,
                };
            }
        }

        // Recorded before parsing: a page whose markup no longer matches stays
        // "not updated" until its timestamp advances again.
        self.freshness.record(&shop.url, decision.timestamp).await;

        match self.parser.parse_items(&page.body, shop) {
            Ok(items) => {
                info!("✅ {}: parsed {} items", shop.name, items.len());
                self.shop_cache.store(&shop.name, items.clone()).await;
                ShopOutcome {
                    shop: shop.name.clone(),
                    items,
                    source: ItemSource::Live,
                }
            }
            Err(e) => {
                warn!("⚠️ {}: {}, using fallback items", shop.name, e);
                ShopOutcome::fallback(shop)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(shop: &str, source: ItemSource, items: Vec<Item>) -> ShopOutcome {
        ShopOutcome {
            shop: shop.to_string(),
            items,
            source,
        }
    }

    #[test]
    fn test_outcomes_keep_shop_order() {
        let combined = OrchestratorOutcome::from_shop_outcomes(vec![
            outcome("hentai366", ItemSource::Fallback, fallback_catalog::for_shop("hentai366")),
            outcome("hentai365", ItemSource::Live, fallback_catalog::for_shop("hentai365")),
        ]);

        assert_eq!(combined.items.len(), 8);
        assert!(combined.items[..4].iter().all(|item| item.shop == "hentai366"));
        assert!(combined.items[4..].iter().all(|item| item.shop == "hentai365"));
        assert_eq!(combined.updated_shops, vec!["hentai365"]);
    }

    #[test]
    fn test_cached_shops_are_not_updated() {
        let combined = OrchestratorOutcome::from_shop_outcomes(vec![outcome(
            "hentai365",
            ItemSource::ShopCache,
            fallback_catalog::for_shop("hentai365"),
        )]);
        assert!(combined.updated_shops.is_empty());
    }

    #[test]
    fn test_all_empty_becomes_full_catalog() {
        let combined = OrchestratorOutcome::from_shop_outcomes(vec![
            outcome("x", ItemSource::Fallback, Vec::new()),
            outcome("y", ItemSource::Fallback, Vec::new()),
        ]);
        assert_eq!(combined.items, fallback_catalog::all().to_vec());
        assert!(combined.updated_shops.is_empty());
    }
}
