//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for the BOOTH shop listing markup. Each field is a
//! list of fallbacks tried in order.

use serde::{Deserialize, Serialize};

/// CSS selectors for a shop listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCardSelectors {
    /// Selectors for item card containers
    pub item_card: Vec<String>,

    /// Anchor whose `href` is the item URL
    pub title_anchor: Vec<String>,

    pub title: Vec<String>,

    /// Thumbnail `<img>`; `src` first, then `data-src` for lazy-loaded images
    pub thumbnail: Vec<String>,

    pub price: Vec<String>,

    /// Every match inside a card becomes a tag
    pub category: Vec<String>,

    /// `<time datetime=...>` in the shop introduction block
    pub shop_updated_time: Vec<String>,
}

impl Default for ItemCardSelectors {
    fn default() -> Self {
        Self {
            item_card: vec![".item-card".to_string()],
            title_anchor: vec!["a.item-card__title-anchor".to_string()],
            title: vec![".item-card__title".to_string()],
            thumbnail: vec![".item-card__thumbnail-image".to_string()],
            price: vec![".price".to_string()],
            category: vec![".item-card__category".to_string()],
            shop_updated_time: vec![".shop-introduction time".to_string()],
        }
    }
}
