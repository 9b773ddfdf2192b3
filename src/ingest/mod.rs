// src/ingest/mod.rs
//! Source gateway: pulls raw records from the content store and the launch API
//! and normalizes them into [`Article`] / [`Launch`].
//!
//! Every field read is total. A missing property at any depth resolves to the
//! field's default, never to an error.

pub mod providers;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;

use crate::config::FeedDatabases;
use crate::error::GatewayError;
use crate::ingest::types::{
    Article, Feed, Hub, HubFacets, Launch, LaunchSource, PageSource,
};

/// Upstream page size for database queries.
pub const PAGE_SIZE: usize = 100;
/// Launches requested from (and returned by) the launch feed.
pub const LAUNCH_LIMIT: usize = 10;

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_PRIORITY: &str = "🟢 Low";
pub const UNKNOWN: &str = "Unknown";
pub const NO_MISSION_DESCRIPTION: &str = "No description available";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("gateway_fetch_total", "Upstream fetches started, per feed.");
        describe_counter!("gateway_pages_total", "Database query pages received.");
        describe_counter!(
            "gateway_records_total",
            "Records normalized from upstream payloads."
        );
        describe_counter!(
            "gateway_upstream_errors_total",
            "Upstream fetch/parse errors, per feed."
        );
        describe_histogram!("gateway_fetch_ms", "Full fetch time in milliseconds, per feed.");
    });
}

/* ----------------------------
Total field extraction
---------------------------- */

/// Non-empty string at a JSON pointer.
fn str_at<'a>(v: &'a Value, pointer: &str) -> Option<&'a str> {
    v.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn string_or(v: &Value, pointer: &str, default: &str) -> String {
    str_at(v, pointer).unwrap_or(default).to_string()
}

/// Ids arrive as strings (Notion, LL2) but tolerate numbers.
fn id_of(v: &Value) -> String {
    match v.get("id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// `properties.<name>.title[0].plain_text`, falling back across property names.
fn title_of(page: &Value) -> String {
    ["/properties/Nom/title/0/plain_text", "/properties/Title/title/0/plain_text"]
        .iter()
        .find_map(|p| str_at(page, p))
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// Normalize one content-store page into an article with `hub` facets.
pub fn normalize_article(page: &Value, hub: Hub) -> Article {
    let facets = match hub {
        Hub::Sport => HubFacets::Sport {
            sport: string_or(page, "/properties/Sport/select/name", "Multi-sport"),
            topic: string_or(
                page,
                "/properties/Thématique/multi_select/0/name",
                "Business",
            ),
            region: string_or(page, "/properties/Region/select/name", "Global"),
        },
        Hub::Space => HubFacets::Space {
            agency: string_or(page, "/properties/Agency/select/name", "Various"),
            mission: string_or(page, "/properties/Mission Type/select/name", "General"),
            topic: string_or(page, "/properties/Topic/select/name", "News"),
        },
    };

    Article {
        id: id_of(page),
        title: title_of(page),
        description: string_or(page, "/properties/Description/rich_text/0/plain_text", ""),
        date: string_or(page, "/properties/Date/date/start", ""),
        link: string_or(page, "/properties/Link/url", ""),
        priority: string_or(page, "/properties/Priority/select/name", DEFAULT_PRIORITY),
        facets,
    }
}

/// First `vidURLs` entry: an object with `url`, or a bare string.
fn livestream_of(raw: &Value) -> Option<String> {
    match raw.pointer("/vidURLs/0")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        obj @ Value::Object(_) => str_at(obj, "/url").map(str::to_string),
        _ => None,
    }
}

/// A zero or out-of-range probability counts as unknown.
fn probability_of(raw: &Value) -> Option<u8> {
    raw.get("probability")
        .and_then(Value::as_f64)
        .filter(|p| *p <= 100.0)
        .map(|p| p.round())
        .filter(|p| *p >= 1.0)
        .map(|p| p as u8)
}

/// Normalize one launch record.
pub fn normalize_launch(raw: &Value) -> Launch {
    Launch {
        id: id_of(raw),
        name: string_or(raw, "/name", UNKNOWN),
        date: string_or(raw, "/net", ""),
        rocket: string_or(raw, "/rocket/configuration/name", UNKNOWN),
        agency: string_or(raw, "/launch_service_provider/name", UNKNOWN),
        location: string_or(raw, "/pad/location/name", UNKNOWN),
        mission: string_or(raw, "/mission/description", NO_MISSION_DESCRIPTION),
        status: string_or(raw, "/status/name", UNKNOWN),
        webcast: raw
            .get("webcast_live")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        livestream: livestream_of(raw),
        image: str_at(raw, "/image")
            .or_else(|| str_at(raw, "/rocket/configuration/image_url"))
            .map(str::to_string),
        probability: probability_of(raw),
    }
}

/// Normalize a launch feed body. `results` must be an array.
pub fn normalize_launches(payload: &Value) -> Result<Vec<Launch>, GatewayError> {
    let items = payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| GatewayError::Malformed("launch feed has no results array".into()))?;
    Ok(items.iter().take(LAUNCH_LIMIT).map(normalize_launch).collect())
}

/// Follow the cursor until the source reports no more pages.
pub async fn collect_pages(
    source: &dyn PageSource,
    database_id: &str,
) -> Result<Vec<Value>, GatewayError> {
    let mut all = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = source.query_page(database_id, cursor.as_deref()).await?;
        counter!("gateway_pages_total").increment(1);
        all.extend(page.results);

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                tracing::warn!(
                    target: "gateway",
                    source = source.name(),
                    fetched = all.len(),
                    "has_more without next_cursor; stopping pagination"
                );
                break;
            }
        }
    }
    Ok(all)
}

/// Both upstreams behind one handle. Holds no mutable state.
#[derive(Clone)]
pub struct Gateway {
    pages: Arc<dyn PageSource>,
    launches: Arc<dyn LaunchSource>,
    databases: FeedDatabases,
}

impl Gateway {
    pub fn new(
        pages: Arc<dyn PageSource>,
        launches: Arc<dyn LaunchSource>,
        databases: FeedDatabases,
    ) -> Self {
        Self {
            pages,
            launches,
            databases,
        }
    }

    /// All articles of `feed`, newest first (upstream sort order).
    pub async fn fetch_articles(&self, feed: Feed) -> Result<Vec<Article>, GatewayError> {
        ensure_metrics_described();
        counter!("gateway_fetch_total", "feed" => feed.as_str()).increment(1);
        let t0 = std::time::Instant::now();

        let result = match self.databases.database_for(feed) {
            Some(db) => collect_pages(self.pages.as_ref(), db).await.map(|pages| {
                let hub = feed.hub();
                pages.iter().map(|p| normalize_article(p, hub)).collect::<Vec<_>>()
            }),
            None => Err(GatewayError::MissingConfig("database id for article feed")),
        };

        self.finish(feed.as_str(), t0, result)
    }

    /// Up to [`LAUNCH_LIMIT`] upcoming launches.
    pub async fn fetch_launches(&self) -> Result<Vec<Launch>, GatewayError> {
        ensure_metrics_described();
        counter!("gateway_fetch_total", "feed" => "launches").increment(1);
        let t0 = std::time::Instant::now();

        let result = match self.launches.fetch_upcoming(LAUNCH_LIMIT).await {
            Ok(body) => normalize_launches(&body),
            Err(e) => Err(e),
        };

        self.finish("launches", t0, result)
    }

    fn finish<T>(
        &self,
        feed: &'static str,
        t0: std::time::Instant,
        result: Result<Vec<T>, GatewayError>,
    ) -> Result<Vec<T>, GatewayError> {
        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("gateway_fetch_ms", "feed" => feed).record(ms);
        match &result {
            Ok(items) => {
                counter!("gateway_records_total", "feed" => feed).increment(items.len() as u64);
                tracing::info!(target: "gateway", feed, records = items.len(), ms, "fetched");
            }
            Err(e) => {
                counter!("gateway_upstream_errors_total", "feed" => feed).increment(1);
                tracing::warn!(target: "gateway", feed, error = %e, "upstream error");
            }
        }
        result
    }
}
