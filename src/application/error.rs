//! Errors that escape the pipeline
//!
//! Fetch, challenge and parse failures are recovered per shop and never show
//! up here. What remains are setup problems and malformed shop URLs.

use thiserror::Error;

use crate::domain::ShopUrlError;
use crate::infrastructure::{FetchError, ParsingError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GalleryError {
    #[error(transparent)]
    InvalidShopUrl(#[from] ShopUrlError),

    #[error("Failed to build page fetcher: {0}")]
    Fetcher(#[from] FetchError),

    #[error("Failed to build page parser: {0}")]
    Parser(#[from] ParsingError),
}
