// src/lib.rs
// Public library surface shared by the server, the terminal client and the tests.

pub mod api;
pub mod cache;
pub mod classify;
pub mod config;
pub mod countdown;
pub mod error;
pub mod filter;
pub mod hub;
pub mod ingest;
pub mod metrics;
pub mod trending;

use std::sync::Arc;

use axum::Router;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use crate::api::{router, AppState};

use crate::config::keywords::load_keywords_default;
use crate::config::AppConfig;
use crate::ingest::providers::{launch_library::LaunchLibraryClient, notion::NotionClient};
use crate::ingest::Gateway;

/// Compact tracing logs, enabled only with `DASHBOARD_DEV_LOG=1`.
/// Safe to call more than once.
pub fn init_tracing() {
    let dev_flag = std::env::var("DASHBOARD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");
    if !dev_flag {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gateway=info,api=info,cache=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

/// Wire config, upstream clients, caches and routes into one router.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = AppConfig::from_env();
    let keywords = load_keywords_default(cfg.keywords_path.as_deref())?;

    let notion = NotionClient::new(cfg.notion_api_base.clone(), cfg.notion_token.clone())?;
    let launches = LaunchLibraryClient::new(cfg.launch_api_base.clone())?;
    let gateway = Gateway::new(Arc::new(notion), Arc::new(launches), cfg.databases.clone());

    if cfg.notion_token.is_none() {
        tracing::warn!(target: "api", "NOTION_TOKEN unset; article endpoints will fail");
    }

    // Recorder first, so the cache TTL gauges set in AppState::new are kept.
    let metrics = if cfg.metrics_enabled {
        Some(metrics::Metrics::init()?)
    } else {
        None
    };

    let app = router(AppState::new(gateway, &cfg, keywords));
    Ok(match metrics {
        Some(m) => app.merge(m.router()),
        None => app,
    })
}
