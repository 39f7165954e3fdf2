//! Domain module - Core business types
//!
//! This module contains the listing model shared by every pipeline stage
//! and the static placeholder catalog.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod constants;
pub mod fallback_catalog;
pub mod item;

// Re-export commonly used items for convenience
pub use item::{Item, ItemFilter, Shop, ShopUrlError, all_shops, all_tags};
