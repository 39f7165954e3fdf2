//! Last successfully parsed item list per shop
//!
//! Entries are only ever written with a non-empty list and live for the
//! lifetime of the owning state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::Item;

#[derive(Debug, Clone)]
pub struct ShopCacheEntry {
    pub items: Arc<Vec<Item>>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ShopCache {
    entries: RwLock<HashMap<String, ShopCacheEntry>>,
}

impl ShopCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached items for a shop; `None` when nothing was ever parsed for it.
    pub async fn get(&self, shop_name: &str) -> Option<Arc<Vec<Item>>> {
        self.entries
            .read()
            .await
            .get(shop_name)
            .map(|entry| Arc::clone(&entry.items))
    }

    pub async fn entry(&self, shop_name: &str) -> Option<ShopCacheEntry> {
        self.entries.read().await.get(shop_name).cloned()
    }

    /// Overwrite the shop's entry. Empty lists are ignored; returns whether it was stored.
    pub async fn store(&self, shop_name: &str, items: Vec<Item>) -> bool {
        if items.is_empty() {
            return false;
        }

        let entry = ShopCacheEntry {
            items: Arc::new(items),
            stored_at: Utc::now(),
        };
        self.entries
            .write()
            .await
            .insert(shop_name.to_string(), entry);
        true
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
