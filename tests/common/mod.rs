//! Shared fixtures: scripted page fetcher and listing markup builders
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use booth_showcase_lib::application::AppState;
use booth_showcase_lib::infrastructure::config::{AppConfig, ShopConfig};
use booth_showcase_lib::infrastructure::parsing::{ItemCardSelectors, SequentialIdStrategy};
use booth_showcase_lib::infrastructure::{FetchError, FetchedPage, ItemCardParser, PageFetcher};

pub const SHOP_A: &str = "https://hentai365.booth.pm/";
pub const SHOP_B: &str = "https://hentai366.booth.pm/";
pub const SHOP_C: &str = "https://hentai367.booth.pm/";

pub const LAST_MODIFIED: &str = "Wed, 21 Oct 2015 07:28:00 GMT";
pub const LATER_MODIFIED: &str = "Thu, 22 Oct 2015 07:28:00 GMT";

pub const CHALLENGE_BODY: &str =
    "<html><body><h1>Cloudflare</h1><p>Please complete the security challenge</p></body></html>";

/// Fetcher answering from a per-URL script that tests may rewrite between runs
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Result<FetchedPage, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn page(&self, url: &str, body: impl Into<String>, last_modified: Option<&str>) {
        self.set(
            url,
            Ok(FetchedPage {
                body: body.into(),
                last_modified: last_modified.map(str::to_string),
            }),
        );
    }

    pub fn status(&self, url: &str, status: u16) {
        self.set(
            url,
            Err(FetchError::Status {
                status,
                url: url.to_string(),
            }),
        );
    }

    pub fn set(&self, url: &str, response: Result<FetchedPage, FetchError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Transport {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                })
            })
    }
}

/// Fetcher whose task dies for one URL and delegates the rest
pub struct PanickingFetcher {
    pub panic_on: String,
    pub inner: Arc<ScriptedFetcher>,
}

#[async_trait]
impl PageFetcher for PanickingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if url == self.panic_on {
            panic!("fetcher blew up for {url}");
        }
        self.inner.fetch(url).await
    }
}

pub struct Card<'a> {
    pub href: &'a str,
    pub title: &'a str,
    pub src: &'a str,
    pub data_src: Option<&'a str>,
    pub price: &'a str,
    pub tags: &'a [&'a str],
}

impl<'a> Card<'a> {
    pub fn new(href: &'a str, title: &'a str) -> Self {
        Self {
            href,
            title,
            src: "https://booth.pximg.net/thumb.png",
            data_src: None,
            price: "¥500",
            tags: &["イラスト集"],
        }
    }
}

pub fn listing_page(cards: &[Card]) -> String {
    listing_page_with_time(cards, None)
}

pub fn listing_page_with_time(cards: &[Card], shop_updated: Option<&str>) -> String {
    let mut html = String::from("<html><body>");
    if let Some(datetime) = shop_updated {
        html.push_str(&format!(
            r#"<div class="shop-introduction"><time datetime="{datetime}"></time></div>"#
        ));
    }
    html.push_str("<ul>");
    for card in cards {
        let data_src = card
            .data_src
            .map(|value| format!(r#" data-src="{value}""#))
            .unwrap_or_default();
        let tags: String = card
            .tags
            .iter()
            .map(|tag| format!(r#"<a class="item-card__category">{tag}</a>"#))
            .collect();
        html.push_str(&format!(
            r#"<li class="item-card">
                 <a class="item-card__title-anchor" href="{href}"><div class="item-card__title">{title}</div></a>
                 <img class="item-card__thumbnail-image" src="{src}"{data_src}>
                 <div class="price">{price}</div>
                 {tags}
               </li>"#,
            href = card.href,
            title = card.title,
            src = card.src,
            price = card.price,
        ));
    }
    html.push_str("</ul></body></html>");
    html
}

pub fn config_for(shop_urls: &[&str]) -> AppConfig {
    let mut config = AppConfig::default();
    config.shops = shop_urls
        .iter()
        .map(|url| ShopConfig {
            name: url
                .trim_start_matches("https://")
                .split('.')
                .next()
                .unwrap_or_default()
                .to_string(),
            url: (*url).to_string(),
        })
        .collect();
    config.cron.token = Some("test-token".to_string());
    config
}

pub fn parser() -> Arc<ItemCardParser> {
    Arc::new(
        ItemCardParser::with_config(
            &ItemCardSelectors::default(),
            Arc::new(SequentialIdStrategy::new("gen-")),
        )
        .unwrap(),
    )
}

pub fn state_with(fetcher: Arc<dyn PageFetcher>, shop_urls: &[&str]) -> AppState {
    AppState::with_components(config_for(shop_urls), fetcher, parser())
}
