use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::constants::catalog::DEFAULT_TAG;

/// One product listing as shown in the gallery.
///
/// `price` is kept exactly as displayed on the shop page (for example `¥1,000`);
/// locale-formatted prices are opaque to this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub title: String,
    /// Empty when the card had no thumbnail; consumers render a placeholder.
    pub image_url: String,
    pub url: String,
    pub price: String,
    pub shop: String,
    /// Never empty, see [`Item::normalize_tags`].
    pub tags: Vec<String>,
}

impl Item {
    /// Substitute the default tag when a listing carries no category.
    pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
        if tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            tags
        }
    }

    /// Final path segment of an item URL (`.../items/123` -> `123`).
    ///
    /// Returns `None` for an empty URL or one ending in `/`.
    pub fn id_from_url(url: &str) -> Option<&str> {
        url.rsplit('/').next().filter(|segment| !segment.is_empty())
    }
}

/// A configured shop: its name is the subdomain of the listing URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    pub url: String,
}

impl Shop {
    /// Derive the shop from its listing URL (`https://foo.booth.pm/` -> `foo`).
    pub fn from_url(url: &str) -> Result<Self, ShopUrlError> {
        let parsed = Url::parse(url).map_err(|e| ShopUrlError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let name = parsed
            .host_str()
            .and_then(|host| host.split('.').next())
            .filter(|label| !label.is_empty())
            .ok_or_else(|| ShopUrlError {
                url: url.to_string(),
                reason: "URL has no host".to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid shop URL '{url}': {reason}")]
pub struct ShopUrlError {
    pub url: String,
    pub reason: String,
}

/// Gallery filter: any selected tag matches, shop must be one of the selected.
/// Empty selections do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub tags: Vec<String>,
    pub shops: Vec<String>,
}

impl ItemFilter {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.shops.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        let tag_ok = self.tags.is_empty() || self.tags.iter().any(|tag| item.tags.contains(tag));
        let shop_ok = self.shops.is_empty() || self.shops.contains(&item.shop);
        tag_ok && shop_ok
    }

    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

/// Every distinct tag, in first-seen order.
pub fn all_tags(items: &[Item]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in items.iter().flat_map(|item| &item.tags) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Every distinct shop name, in first-seen order.
pub fn all_shops(items: &[Item]) -> Vec<String> {
    let mut shops: Vec<String> = Vec::new();
    for item in items {
        if !shops.contains(&item.shop) {
            shops.push(item.shop.clone());
        }
    }
    shops
}
