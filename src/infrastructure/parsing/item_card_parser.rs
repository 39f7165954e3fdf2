//! Item card parser for the current BOOTH shop markup
//!
//! Best-effort extraction: a card with missing pieces still yields an item with
//! empty strings; only a page without any card is a failure.

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::config::ItemCardSelectors;
use super::id_strategy::IdStrategy;
use super::PageParser;
use crate::domain::{Item, Shop};
use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};

/// Parser for `.item-card` listings
pub struct ItemCardParser {
    card_selectors: Vec<(String, Selector)>,
    anchor_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    thumbnail_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    category_selectors: Vec<Selector>,
    shop_time_selectors: Vec<Selector>,
    id_strategy: Arc<dyn IdStrategy>,
}

impl ItemCardParser {
    /// Create parser with custom selectors and id strategy
    pub fn with_config(
        selectors: &ItemCardSelectors,
        id_strategy: Arc<dyn IdStrategy>,
    ) -> ParsingResult<Self> {
        let card_selectors = selectors
            .item_card
            .iter()
            .cloned()
            .zip(Self::compile_selectors("item_card", &selectors.item_card)?)
            .collect();

        Ok(Self {
            card_selectors,
            anchor_selectors: Self::compile_selectors("title_anchor", &selectors.title_anchor)?,
            title_selectors: Self::compile_selectors("title", &selectors.title)?,
            thumbnail_selectors: Self::compile_selectors("thumbnail", &selectors.thumbnail)?,
            price_selectors: Self::compile_selectors("price", &selectors.price)?,
            category_selectors: Self::compile_selectors("category", &selectors.category)?,
            shop_time_selectors: Self::compile_selectors(
                "shop_updated_time",
                &selectors.shop_updated_time,
            )?,
            id_strategy,
        })
    }

    /// Compile selector strings; any invalid one is a configuration error
    fn compile_selectors(field: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
        if selector_strings.is_empty() {
            return Err(ParsingError::NoSelectors {
                field: field.to_string(),
            });
        }

        selector_strings
            .iter()
            .map(|selector_str| {
                Selector::parse(selector_str)
                    .map_err(|e| ParsingError::invalid_selector(selector_str, &e.to_string()))
            })
            .collect()
    }

    fn extract_item(&self, card: &ElementRef, shop: &Shop) -> Item {
        let url = self
            .first_attr(card, &self.anchor_selectors, "href")
            .map(|href| Self::resolve_url(&href, &shop.url))
            .unwrap_or_default();

        let id = Item::id_from_url(&url)
            .map(str::to_string)
            .unwrap_or_else(|| self.id_strategy.fallback_id());

        let title = self.first_text(card, &self.title_selectors).unwrap_or_default();

        // Lazy-loaded thumbnails keep the real URL in data-src
        let image_url = self
            .first_attr(card, &self.thumbnail_selectors, "src")
            .filter(|src| !src.is_empty())
            .or_else(|| self.first_attr(card, &self.thumbnail_selectors, "data-src"))
            .unwrap_or_default();

        let price = self.first_text(card, &self.price_selectors).unwrap_or_default();

        Item {
            id,
            title,
            image_url,
            url,
            price,
            shop: shop.name.clone(),
            tags: Item::normalize_tags(self.category_texts(card)),
        }
    }

    /// Trimmed text of the first element matching any selector
    fn first_text(&self, card: &ElementRef, selectors: &[Selector]) -> Option<String> {
        selectors.iter().find_map(|selector| {
            card.select(selector)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
        })
    }

    fn first_attr(&self, card: &ElementRef, selectors: &[Selector], attr: &str) -> Option<String> {
        selectors.iter().find_map(|selector| {
            card.select(selector)
                .next()
                .and_then(|e| e.value().attr(attr))
                .map(|value| value.trim().to_string())
        })
    }

    /// Every non-empty category label from the first selector that finds any
    fn category_texts(&self, card: &ElementRef) -> Vec<String> {
        for selector in &self.category_selectors {
            let tags: Vec<String> = card
                .select(selector)
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect();
            if !tags.is_empty() {
                return tags;
            }
        }
        Vec::new()
    }

    /// Absolute hrefs are kept verbatim; relative ones are joined onto the shop URL
    fn resolve_url(href: &str, base_url: &str) -> String {
        if href.is_empty() || Url::parse(href).is_ok() {
            return href.to_string();
        }

        match Url::parse(base_url).and_then(|base| base.join(href)) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                warn!("Failed to resolve '{}' against {}: {}", href, base_url, e);
                href.to_string()
            }
        }
    }
}

impl PageParser for ItemCardParser {
    fn parse_items(&self, html: &str, shop: &Shop) -> ParsingResult<Vec<Item>> {
        let document = Html::parse_document(html);
        let mut tried_selectors = Vec::new();

        for (selector_str, selector) in &self.card_selectors {
            tried_selectors.push(selector_str.clone());

            let items: Vec<Item> = document
                .select(selector)
                .map(|card| self.extract_item(&card, shop))
                .collect();

            if !items.is_empty() {
                debug!(
                    "Extracted {} items for {} using '{}'",
                    items.len(),
                    shop.name,
                    selector_str
                );
                return Ok(items);
            }
        }

        Err(ParsingError::no_items_found(&shop.name, tried_selectors))
    }

    fn shop_updated_at(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        self.shop_time_selectors.iter().find_map(|selector| {
            document
                .select(selector)
                .find_map(|e| e.value().attr("datetime"))
                .map(str::to_string)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::{RandomIdStrategy, SequentialIdStrategy};

    fn shop() -> Shop {
        Shop::from_url("https://alpha.booth.pm/").unwrap()
    }

    fn parser() -> ItemCardParser {
        ItemCardParser::with_config(
            &ItemCardSelectors::default(),
            Arc::new(SequentialIdStrategy::new("gen-")),
        )
        .unwrap()
    }

    const PAGE: &str = r#"
        <html><body>
          <div class="shop-introduction"><time datetime="2024-05-01T10:00:00+09:00">5/1</time></div>
          <ul>
            <li class="item-card">
              <a class="item-card__title-anchor" href="https://alpha.booth.pm/items/1001">
                <div class="item-card__title">  First Book  </div>
              </a>
              <img class="item-card__thumbnail-image" src="https://img.example/1.png">
              <div class="price"> ¥500 </div>
              <a class="item-card__category">イラスト集</a>
              <a class="item-card__category"> SF </a>
            </li>
            <li class="item-card">
              <a class="item-card__title-anchor" href="/items/1002">
                <div class="item-card__title">Second</div>
              </a>
              <img class="item-card__thumbnail-image" src="" data-src="http://x/img.png">
              <div class="price">¥1,000</div>
            </li>
            <li class="item-card">
              <a class="item-card__title-anchor" href="/items/1003">
                <div class="item-card__title">Third</div>
              </a>
              <img class="item-card__thumbnail-image" data-src="http://x/i.png">
            </li>
          </ul>
        </body></html>
    "#;

    #[test]
    fn test_parser_creation() {
        let parser =
            ItemCardParser::with_config(&ItemCardSelectors::default(), Arc::new(RandomIdStrategy));
        assert!(parser.is_ok());
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let selectors = ItemCardSelectors {
            price: vec!["[[".to_string()],
            ..ItemCardSelectors::default()
        };
        let result = ItemCardParser::with_config(&selectors, Arc::new(RandomIdStrategy));
        assert!(matches!(result, Err(ParsingError::InvalidSelector { .. })));
    }

    #[test]
    fn test_parses_item_cards() {
        let items = parser().parse_items(PAGE, &shop()).unwrap();
        assert_eq!(items.len(), 3);

        let first = &items[0];
        assert_eq!(first.id, "1001");
        assert_eq!(first.title, "First Book");
        assert_eq!(first.image_url, "https://img.example/1.png");
        assert_eq!(first.url, "https://alpha.booth.pm/items/1001");
        assert_eq!(first.price, "¥500");
        assert_eq!(first.shop, "alpha");
        assert_eq!(first.tags, vec!["イラスト集", "SF"]);
    }

    #[test]
    fn test_lazy_image_and_default_tag() {
        let items = parser().parse_items(PAGE, &shop()).unwrap();
        let second = &items[1];
        assert_eq!(second.image_url, "http://x/img.png");
        assert_eq!(second.tags, vec!["イラスト"]);
        assert_eq!(second.url, "https://alpha.booth.pm/items/1002");
        assert_eq!(second.id, "1002");

        // No src attribute at all
        let third = &items[2];
        assert_eq!(third.image_url, "http://x/i.png");
        assert_eq!(third.tags, vec!["イラスト"]);
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let html = r#"<div class="item-card"><span>nothing useful</span></div>"#;
        let items = parser().parse_items(html, &shop()).unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.id, "gen-1");
        assert_eq!(item.url, "");
        assert_eq!(item.title, "");
        assert_eq!(item.image_url, "");
        assert_eq!(item.price, "");
        assert_eq!(item.tags, vec!["イラスト"]);
    }

    #[test]
    fn test_no_cards_is_an_error() {
        let result = parser().parse_items("<html><body><p>empty</p></body></html>", &shop());
        match result {
            Err(ParsingError::NoItemsFound { shop, tried_selectors }) => {
                assert_eq!(shop, "alpha");
                assert_eq!(tried_selectors, vec![".item-card"]);
            }
            other => panic!("expected NoItemsFound, got {other:?}"),
        }
    }

    #[test]
    fn test_shop_updated_at() {
        assert_eq!(
            parser().shop_updated_at(PAGE).as_deref(),
            Some("2024-05-01T10:00:00+09:00")
        );
        assert_eq!(parser().shop_updated_at("<p>no time</p>"), None);
    }

    #[test]
    fn test_url_resolution() {
        assert_eq!(
            ItemCardParser::resolve_url("/items/1", "https://alpha.booth.pm/"),
            "https://alpha.booth.pm/items/1"
        );
        assert_eq!(
            ItemCardParser::resolve_url("https://other.booth.pm/items/2", "https://alpha.booth.pm/"),
            "https://other.booth.pm/items/2"
        );
        assert_eq!(ItemCardParser::resolve_url("", "https://alpha.booth.pm/"), "");
    }
}
