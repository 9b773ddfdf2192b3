use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::cache::{CacheStatus, TtlCache};
use crate::classify::KeywordTable;
use crate::config::AppConfig;
use crate::error::{ApiError, GatewayError};
use crate::filter::FilterState;
use crate::hub::{build_view, launch_board_view};
use crate::ingest::types::{Article, Feed, Hub, Launch};
use crate::ingest::Gateway;

pub const ARTICLES_ERROR: &str = "Failed to fetch articles from Notion";
pub const LAUNCHES_ERROR: &str = "Failed to fetch upcoming launches";

pub const X_CACHE: &str = "x-cache";

#[derive(Clone)]
pub struct AppState {
    gateway: Arc<Gateway>,
    articles: Arc<TtlCache<Feed, Vec<Article>>>,
    launches: Arc<TtlCache<(), Vec<Launch>>>,
    keywords: Arc<KeywordTable>,
}

impl AppState {
    pub fn new(gateway: Gateway, cfg: &AppConfig, keywords: KeywordTable) -> Self {
        Self {
            gateway: Arc::new(gateway),
            articles: Arc::new(TtlCache::new("articles", cfg.articles_ttl)),
            launches: Arc::new(TtlCache::new("launches", cfg.launches_ttl)),
            keywords: Arc::new(keywords),
        }
    }

    async fn articles(
        &self,
        feed: Feed,
    ) -> Result<(Arc<Vec<Article>>, CacheStatus), GatewayError> {
        let gw = self.gateway.clone();
        self.articles
            .get_or_try_fetch(feed, || async move { gw.fetch_articles(feed).await })
            .await
    }

    async fn launches(&self) -> Result<(Arc<Vec<Launch>>, CacheStatus), GatewayError> {
        let gw = self.gateway.clone();
        self.launches
            .get_or_try_fetch((), || async move { gw.fetch_launches().await })
            .await
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/articles", get(articles_generic))
        .route("/api/articles-sport", get(articles_sport))
        .route("/api/articles-space", get(articles_space))
        .route("/api/launches", get(launches))
        .route("/api/hubs/sport", get(hub_sport))
        .route("/api/hubs/space", get(hub_space))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// JSON list with cache diagnostics and a shared-cache freshness hint.
fn cached_json<T: Serialize>(items: &[T], status: CacheStatus, ttl: Duration) -> Response {
    let mut resp = Json(items).into_response();
    let headers = resp.headers_mut();
    headers.insert(
        HeaderName::from_static(X_CACHE),
        HeaderValue::from_static(status.as_header()),
    );
    if let Ok(v) = HeaderValue::from_str(&format!("public, s-maxage={}", ttl.as_secs())) {
        headers.insert(header::CACHE_CONTROL, v);
    }
    resp
}

async fn feed_response(state: &AppState, feed: Feed) -> Response {
    match state.articles(feed).await {
        Ok((items, status)) => cached_json(&items, status, state.articles.ttl()),
        Err(e) => {
            tracing::warn!(target: "api", feed = feed.as_str(), error = %e, "article feed failed");
            ApiError::new(ARTICLES_ERROR).into_response()
        }
    }
}

async fn articles_generic(State(state): State<AppState>) -> Response {
    feed_response(&state, Feed::Generic).await
}

async fn articles_sport(State(state): State<AppState>) -> Response {
    feed_response(&state, Feed::Sport).await
}

async fn articles_space(State(state): State<AppState>) -> Response {
    feed_response(&state, Feed::Space).await
}

async fn launches(State(state): State<AppState>) -> Response {
    match state.launches().await {
        Ok((items, status)) => cached_json(&items, status, state.launches.ttl()),
        Err(e) => {
            tracing::warn!(target: "api", error = %e, "launch feed failed");
            ApiError::new(LAUNCHES_ERROR).into_response()
        }
    }
}

/// A failed section degrades to empty; its message goes into `errors`.
fn or_empty<T>(
    res: Result<(Arc<Vec<T>>, CacheStatus), GatewayError>,
    msg: &str,
    errors: &mut Vec<String>,
) -> Arc<Vec<T>> {
    match res {
        Ok((items, _)) => items,
        Err(e) => {
            tracing::warn!(target: "api", error = %e, "{msg}");
            errors.push(msg.to_string());
            Arc::new(Vec::new())
        }
    }
}

async fn hub_sport(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let filters = FilterState::from_query(&q);
    let mut errors = Vec::new();
    let articles = or_empty(
        state.articles(Hub::Sport.feed()).await,
        ARTICLES_ERROR,
        &mut errors,
    );

    let mut view = build_view(Hub::Sport, &articles, &filters);
    view.errors = errors;
    Json(&view).into_response()
}

async fn hub_space(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let filters = FilterState::from_query(&q);
    let (articles, launches) =
        tokio::join!(state.articles(Hub::Space.feed()), state.launches());

    let mut errors = Vec::new();
    let articles = or_empty(articles, ARTICLES_ERROR, &mut errors);
    let launches = or_empty(launches, LAUNCHES_ERROR, &mut errors);

    let mut view = build_view(Hub::Space, &articles, &filters);
    view.launches = Some(launch_board_view(&launches, &state.keywords, chrono::Utc::now()));
    view.errors = errors;
    Json(&view).into_response()
}
