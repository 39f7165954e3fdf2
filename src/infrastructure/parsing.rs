//! HTML parsing infrastructure
//!
//! Listing markup is isolated behind [`PageParser`]: a change in the shop page
//! structure needs a new implementation, not changes to the orchestrator.

pub mod config;
pub mod id_strategy;
pub mod item_card_parser;

// Re-export public types
pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::ItemCardSelectors;
pub use id_strategy::{IdStrategy, RandomIdStrategy, SequentialIdStrategy};
pub use item_card_parser::ItemCardParser;

use crate::domain::{Item, Shop};

/// One markup version of a shop listing page
pub trait PageParser: Send + Sync {
    /// Extract every item card. Zero cards is [`ParsingError::NoItemsFound`].
    fn parse_items(&self, html: &str, shop: &Shop) -> ParsingResult<Vec<Item>>;

    /// Raw `datetime` value of the shop's own "last updated" marker, if any
    fn shop_updated_at(&self, html: &str) -> Option<String>;
}
