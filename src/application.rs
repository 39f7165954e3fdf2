//! Application layer - the scrape-and-cache pipeline
//!
//! This module coordinates fetching, freshness checks, parsing and caching
//! across all configured shops.

pub mod aggregate_cache;
pub mod error;
pub mod shop_orchestrator;
pub mod state;

// Re-export commonly used items
pub use aggregate_cache::{AggregateCache, ItemsSnapshot};
pub use error::GalleryError;
pub use shop_orchestrator::{ItemSource, OrchestratorOutcome, ShopOrchestrator, ShopOutcome};
pub use state::AppState;
