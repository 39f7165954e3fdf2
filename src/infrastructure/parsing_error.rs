//! Parsing error types for shop listing extraction
//!
//! Item-level problems never surface here: a missing field becomes an empty
//! string. Only page-level failures are reported.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No valid selectors configured for '{field}'")]
    NoSelectors { field: String },

    #[error("No item cards found for shop {shop}")]
    NoItemsFound {
        shop: String,
        tried_selectors: Vec<String>,
    },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn no_items_found(shop: &str, tried_selectors: Vec<String>) -> Self {
        Self::NoItemsFound {
            shop: shop.to_string(),
            tried_selectors,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
