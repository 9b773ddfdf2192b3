// src/config/mod.rs
//! Runtime configuration, read from the process environment (`.env` in dev).

pub mod keywords;

use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::types::Feed;

// --- env names ---
pub const ENV_NOTION_TOKEN: &str = "NOTION_TOKEN";
pub const ENV_NOTION_DATABASE_ID: &str = "NOTION_DATABASE_ID";
pub const ENV_DATABASE_ID_SPORT: &str = "DATABASE_ID_SPORT";
pub const ENV_DATABASE_ID_SPACE: &str = "DATABASE_ID_SPACE";
pub const ENV_NOTION_API_BASE: &str = "NOTION_API_BASE";
pub const ENV_LAUNCH_API_BASE: &str = "LAUNCH_API_BASE";
pub const ENV_ARTICLES_TTL: &str = "ARTICLES_CACHE_TTL_SECS";
pub const ENV_LAUNCHES_TTL: &str = "LAUNCHES_CACHE_TTL_SECS";
pub const ENV_LAUNCH_KEYWORDS_PATH: &str = "LAUNCH_KEYWORDS_PATH";
pub const ENV_METRICS_ENABLED: &str = "METRICS_ENABLED";

// --- defaults ---
pub const DEFAULT_NOTION_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_LAUNCH_API_BASE: &str = "https://ll.thespacedevs.com/2.2.0";
pub const DEFAULT_ARTICLES_TTL_SECS: u64 = 1800;
pub const DEFAULT_LAUNCHES_TTL_SECS: u64 = 3600;

/// Content-store database ids per feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDatabases {
    pub generic: Option<String>,
    pub sport: Option<String>,
    pub space: Option<String>,
}

impl FeedDatabases {
    /// The sport feed falls back to the generic database when no dedicated id is set.
    pub fn database_for(&self, feed: Feed) -> Option<&str> {
        match feed {
            Feed::Generic => self.generic.as_deref(),
            Feed::Sport => self.sport.as_deref().or(self.generic.as_deref()),
            Feed::Space => self.space.as_deref(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub notion_token: Option<String>,
    pub notion_api_base: String,
    pub launch_api_base: String,
    pub databases: FeedDatabases,
    pub articles_ttl: Duration,
    pub launches_ttl: Duration,
    pub keywords_path: Option<PathBuf>,
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notion_token: None,
            notion_api_base: DEFAULT_NOTION_API_BASE.to_string(),
            launch_api_base: DEFAULT_LAUNCH_API_BASE.to_string(),
            databases: FeedDatabases::default(),
            articles_ttl: Duration::from_secs(DEFAULT_ARTICLES_TTL_SECS),
            launches_ttl: Duration::from_secs(DEFAULT_LAUNCHES_TTL_SECS),
            keywords_path: None,
            metrics_enabled: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            notion_token: get(ENV_NOTION_TOKEN),
            notion_api_base: get(ENV_NOTION_API_BASE)
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_NOTION_API_BASE.to_string()),
            launch_api_base: get(ENV_LAUNCH_API_BASE)
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_LAUNCH_API_BASE.to_string()),
            databases: FeedDatabases {
                generic: get(ENV_NOTION_DATABASE_ID),
                sport: get(ENV_DATABASE_ID_SPORT),
                space: get(ENV_DATABASE_ID_SPACE),
            },
            articles_ttl: parse_secs(get(ENV_ARTICLES_TTL), DEFAULT_ARTICLES_TTL_SECS),
            launches_ttl: parse_secs(get(ENV_LAUNCHES_TTL), DEFAULT_LAUNCHES_TTL_SECS),
            keywords_path: get(ENV_LAUNCH_KEYWORDS_PATH).map(PathBuf::from),
            metrics_enabled: get(ENV_METRICS_ENABLED)
                .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }
}

fn parse_secs(raw: Option<String>, default: u64) -> Duration {
    let secs = raw
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}
