//! HTTP routes over the aggregate item cache
//!
//! - `GET /items?forceUpdate=true&tags=a,b&shops=x` gallery data
//! - `GET /facets` distinct tags and shops of the current item list
//! - `GET /cron?token=...` forced refresh for a scheduled trigger
//! - `GET /healthz`

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::{AppState, GalleryError, ItemsSnapshot};
use crate::domain::{Item, ItemFilter, all_shops, all_tags};

const MOCK_DATA_NOTICE: &str =
    "注意: BOOTHのセキュリティ対策により、一部またはすべてのデータがモックデータである可能性があります。";
const NO_UPDATES_MESSAGE: &str = "更新されたショップはありません";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/items", get(items_handler))
        .route("/facets", get(facets_handler))
        .route("/cron", get(cron_handler))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsQuery {
    /// Only the literal `true` forces a refresh
    pub force_update: Option<String>,
    /// Comma-separated tag names, any of which matches
    pub tags: Option<String>,
    /// Comma-separated shop names
    pub shops: Option<String>,
}

impl ItemsQuery {
    fn force_update(&self) -> bool {
        self.force_update.as_deref() == Some("true")
    }

    fn filter(&self) -> ItemFilter {
        ItemFilter {
            tags: split_list(self.tags.as_deref()),
            shops: split_list(self.shops.as_deref()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CronQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsResponse {
    pub items: Vec<Item>,
    pub last_updated: String,
    pub updated_shops: Vec<String>,
    pub is_updated: bool,
    pub message: String,
    pub is_partially_mock: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronResponse {
    pub success: bool,
    pub is_updated: bool,
    pub updated_shops: Vec<String>,
    pub item_count: usize,
    pub last_updated: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FacetsResponse {
    pub tags: Vec<String>,
    pub shops: Vec<String>,
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn items_handler(
    State(state): State<AppState>,
    Query(query): Query<ItemsQuery>,
) -> Response {
    let snapshot = match state.items.get_items(query.force_update()).await {
        Ok(snapshot) => snapshot,
        Err(e) => return internal_error("Failed to fetch booth items", &e, true),
    };

    let filter = query.filter();
    let items: Vec<Item> = filter.apply(&snapshot.items).into_iter().cloned().collect();
    let message = if snapshot.is_updated() {
        updated_message(&snapshot)
    } else {
        MOCK_DATA_NOTICE.to_string()
    };

    Json(ItemsResponse {
        items,
        last_updated: iso_timestamp(snapshot.last_updated),
        is_updated: snapshot.is_updated(),
        updated_shops: snapshot.updated_shops,
        message,
        is_partially_mock: true,
    })
    .into_response()
}

async fn facets_handler(State(state): State<AppState>) -> Response {
    match state.items.get_items(false).await {
        Ok(snapshot) => Json(FacetsResponse {
            tags: all_tags(&snapshot.items),
            shops: all_shops(&snapshot.items),
        })
        .into_response(),
        Err(e) => internal_error("Failed to fetch booth items", &e, false),
    }
}

async fn cron_handler(
    State(state): State<AppState>,
    Query(query): Query<CronQuery>,
) -> Response {
    if !state.config.cron.authorize(query.token.as_deref()) {
        warn!("Rejected scheduled refresh with an invalid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        )
            .into_response();
    }

    let snapshot = match state.items.get_items(true).await {
        Ok(snapshot) => snapshot,
        Err(e) => return internal_error("Failed to run cron job", &e, false),
    };

    info!(
        "⏰ Scheduled refresh done: {} items, updated {:?}",
        snapshot.items.len(),
        snapshot.updated_shops
    );

    let message = if snapshot.is_updated() {
        updated_message(&snapshot)
    } else {
        NO_UPDATES_MESSAGE.to_string()
    };

    Json(CronResponse {
        success: true,
        is_updated: snapshot.is_updated(),
        item_count: snapshot.items.len(),
        last_updated: iso_timestamp(snapshot.last_updated),
        updated_shops: snapshot.updated_shops,
        message,
    })
    .into_response()
}

fn internal_error(error_message: &str, err: &GalleryError, with_items: bool) -> Response {
    error!("{}: {}", error_message, err);
    let mut body = json!({
        "error": error_message,
        "details": err.to_string(),
    });
    if with_items {
        body["items"] = json!([]);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn updated_message(snapshot: &ItemsSnapshot) -> String {
    format!(
        "{}つのショップのデータが更新されました: {}",
        snapshot.updated_shops.len(),
        snapshot.updated_shops.join(", ")
    )
}

/// `2024-05-01T01:00:00.000Z`
fn iso_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
