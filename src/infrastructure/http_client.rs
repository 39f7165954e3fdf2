//! HTTP page fetcher for shop listing pages
//!
//! Sends browser-like requests with transport caching disabled, returns the raw
//! body together with the `Last-Modified` header, and classifies failures so
//! the orchestrator can fall back without ever surfacing them to callers.

use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{
    Client,
    header::{
        ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, DNT, HeaderMap, HeaderValue, LAST_MODIFIED, PRAGMA,
        REFERER, UPGRADE_INSECURE_REQUESTS,
    },
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::constants::site::{CHALLENGE_PHRASE, CHALLENGE_VENDOR_MARKER};
use crate::infrastructure::config::HttpConfig;

/// Raw result of a successful listing fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub body: String,
    pub last_modified: Option<String>,
}

/// Why a listing could not be used. Every variant leads to the same fallback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP request failed with status {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Security challenge page detected for {url}")]
    ChallengeDetected { url: String },

    #[error("HTTP client configuration error: {message}")]
    Configuration { message: String },
}

impl FetchError {
    fn transport(url: &str, error: &reqwest::Error) -> Self {
        let message = if error.is_timeout() {
            format!("request timed out ({error})")
        } else {
            error.to_string()
        };
        Self::Transport {
            url: url.to_string(),
            message,
        }
    }
}

/// Capability to retrieve one listing page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Heuristic for the anti-automation interstitial
pub fn is_challenge_page(body: &str) -> bool {
    body.contains(CHALLENGE_VENDOR_MARKER) && body.contains(CHALLENGE_PHRASE)
}

/// Reject challenge pages so they take the same path as HTTP failures
pub fn ensure_not_challenge(url: &str, page: FetchedPage) -> Result<FetchedPage, FetchError> {
    if is_challenge_page(&page.body) {
        return Err(FetchError::ChallengeDetected {
            url: url.to_string(),
        });
    }
    Ok(page)
}

/// reqwest-backed fetcher with optional global rate limiting
pub struct HttpPageFetcher {
    client: Client,
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    config: HttpConfig,
}

impl HttpPageFetcher {
    pub fn new(config: HttpConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(&config.user_agent)
            .default_headers(Self::default_headers(&config)?)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        let rate_limiter = NonZeroU32::new(config.max_requests_per_second)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(Self {
            client,
            rate_limiter,
            config,
        })
    }

    fn default_headers(config: &HttpConfig) -> Result<HeaderMap, FetchError> {
        let value = |name: &str, raw: &str| {
            HeaderValue::from_str(raw).map_err(|e| FetchError::Configuration {
                message: format!("Invalid {name} header: {e}"),
            })
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, value("Accept", &config.accept)?);
        headers.insert(ACCEPT_LANGUAGE, value("Accept-Language", &config.accept_language)?);
        headers.insert(REFERER, value("Referer", &config.referer)?);
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache, max-age=0"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        Ok(headers)
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        info!("Fetching shop page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Failed to fetch {}: {} {}",
                url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        debug!("Fetched {} ({} chars, last-modified: {:?})", url, body.len(), last_modified);
        Ok(FetchedPage {
            body,
            last_modified,
        })
    }
}
