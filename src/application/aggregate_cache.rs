//! Combined all-shops item list with a fixed time-to-live

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::application::error::GalleryError;
use crate::application::shop_orchestrator::ShopOrchestrator;
use crate::domain::Item;

/// TTL 기반 캐시 항목을 위한 트레이트
pub trait CacheItem {
    /// 캐시 항목이 만료되었는지 확인
    fn is_expired(&self, ttl: Duration) -> bool;
}

#[derive(Debug, Clone)]
struct CachedAggregate {
    items: Arc<Vec<Item>>,
    fetched_at: DateTime<Utc>,
}

impl CacheItem for CachedAggregate {
    fn is_expired(&self, ttl: Duration) -> bool {
        // 시계가 뒤로 간 경우 (음수 경과 시간) 는 유효한 것으로 취급
        Utc::now()
            .signed_duration_since(self.fetched_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }
}

/// What a caller sees from one read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsSnapshot {
    pub items: Arc<Vec<Item>>,
    /// Empty whenever the snapshot was served from cache
    pub updated_shops: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl ItemsSnapshot {
    pub fn is_updated(&self) -> bool {
        !self.updated_shops.is_empty()
    }
}

pub struct AggregateCache {
    orchestrator: ShopOrchestrator,
    shop_urls: Vec<String>,
    ttl: Duration,
    state: RwLock<Option<CachedAggregate>>,
    /// Serializes orchestrator runs
    refresh_lock: Mutex<()>,
}

impl AggregateCache {
    pub fn new(orchestrator: ShopOrchestrator, shop_urls: Vec<String>, ttl: Duration) -> Self {
        Self {
            orchestrator,
            shop_urls,
            ttl,
            state: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Serve the cached list while it is younger than the TTL, otherwise
    /// (or when forced) run the orchestrator and repopulate.
    pub async fn get_items(&self, force_update: bool) -> Result<ItemsSnapshot, GalleryError> {
        if !force_update {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return Ok(snapshot);
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited
        if !force_update {
            if let Some(snapshot) = self.fresh_snapshot().await {
                return Ok(snapshot);
            }
        }

        let started_at = Utc::now();
        info!("🔄 Refreshing item cache (forced: {})", force_update);
        let outcome = self.orchestrator.scrape_all(&self.shop_urls).await?;

        let items = Arc::new(outcome.items);
        *self.state.write().await = Some(CachedAggregate {
            items: Arc::clone(&items),
            fetched_at: started_at,
        });

        Ok(ItemsSnapshot {
            items,
            updated_shops: outcome.updated_shops,
            last_updated: started_at,
        })
    }

    /// Time of the last population, `None` before the first one
    pub async fn last_fetch_time(&self) -> Option<DateTime<Utc>> {
        self.state.read().await.as_ref().map(|cached| cached.fetched_at)
    }

    async fn fresh_snapshot(&self) -> Option<ItemsSnapshot> {
        let state = self.state.read().await;
        let cached = state.as_ref().filter(|cached| !cached.is_expired(self.ttl))?;
        debug!("Serving cached items from {}", cached.fetched_at);
        Some(ItemsSnapshot {
            items: Arc::clone(&cached.items),
            updated_shops: Vec::new(),
            last_updated: cached.fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let cached = CachedAggregate {
            items: Arc::new(Vec::new()),
            fetched_at: Utc::now() - chrono::Duration::minutes(16),
        };
        assert!(cached.is_expired(Duration::from_secs(15 * 60)));
        assert!(!cached.is_expired(Duration::from_secs(60 * 60)));
        assert!(cached.is_expired(Duration::ZERO));
    }
}
