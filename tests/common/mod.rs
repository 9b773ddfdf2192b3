// tests/common/mod.rs
//
// In-memory upstreams shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use intel_dashboard::config::FeedDatabases;
use intel_dashboard::error::GatewayError;
use intel_dashboard::ingest::types::{LaunchSource, PageSource, QueryPage};
use intel_dashboard::ingest::Gateway;

/// Serves pre-built pages. Cursor `c{n}` addresses page `n`.
pub struct FakePages {
    pub pages: Vec<QueryPage>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakePages {
    pub fn new(pages: Vec<QueryPage>) -> Self {
        Self {
            pages,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    /// Pages of the given sizes, linked by cursors, records numbered globally.
    pub fn sized(sizes: &[usize], page: fn(usize) -> Value) -> Self {
        let mut n = 0;
        let last = sizes.len().saturating_sub(1);
        let pages = sizes
            .iter()
            .enumerate()
            .map(|(i, &size)| {
                let results = (n..n + size).map(page).collect();
                n += size;
                QueryPage {
                    results,
                    has_more: i < last,
                    next_cursor: (i < last).then(|| format!("c{}", i + 1)),
                }
            })
            .collect();
        Self::new(pages)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageSource for FakePages {
    async fn query_page(
        &self,
        _database_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Status(502));
        }
        let idx = match cursor {
            None => 0,
            Some(c) => c
                .trim_start_matches('c')
                .parse::<usize>()
                .map_err(|_| GatewayError::Malformed(format!("bad cursor {c}")))?,
        };
        self.pages
            .get(idx)
            .cloned()
            .ok_or_else(|| GatewayError::Malformed(format!("no page {idx}")))
    }

    fn name(&self) -> &'static str {
        "fake-pages"
    }
}

pub struct FakeLaunches {
    pub body: Option<Value>,
    pub calls: AtomicUsize,
}

impl FakeLaunches {
    pub fn new(launches: Vec<Value>) -> Self {
        Self {
            body: Some(json!({ "count": launches.len(), "results": launches })),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            body: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LaunchSource for FakeLaunches {
    async fn fetch_upcoming(&self, _limit: usize) -> Result<Value, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.body.clone().ok_or(GatewayError::Status(503))
    }

    fn name(&self) -> &'static str {
        "fake-launches"
    }
}

pub fn databases() -> FeedDatabases {
    FeedDatabases {
        generic: Some("db-generic".into()),
        sport: Some("db-sport".into()),
        space: Some("db-space".into()),
    }
}

pub fn gateway(pages: Arc<FakePages>, launches: Arc<FakeLaunches>) -> Gateway {
    Gateway::new(pages, launches, databases())
}

/// Sport-database page with every property set.
pub fn sport_page(id: &str, title: &str, region: &str, sport: &str, topic: &str, priority: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "Nom": { "title": [{ "plain_text": title }] },
            "Description": { "rich_text": [{ "plain_text": format!("About {title}") }] },
            "Date": { "date": { "start": "2025-02-01" } },
            "Link": { "url": format!("https://news.example/{id}") },
            "Priority": { "select": { "name": priority } },
            "Sport": { "select": { "name": sport } },
            "Thématique": { "multi_select": [{ "name": topic }] },
            "Region": { "select": { "name": region } }
        }
    })
}

/// Space-database page.
pub fn space_page(id: &str, title: &str, agency: &str, mission: &str, topic: &str, priority: &str) -> Value {
    json!({
        "id": id,
        "properties": {
            "Title": { "title": [{ "plain_text": title }] },
            "Priority": { "select": { "name": priority } },
            "Agency": { "select": { "name": agency } },
            "Mission Type": { "select": { "name": mission } },
            "Topic": { "select": { "name": topic } }
        }
    })
}

/// Minimal page numbered `n`, used for pagination counts.
pub fn numbered_page(n: usize) -> Value {
    json!({
        "id": format!("p{n}"),
        "properties": { "Nom": { "title": [{ "plain_text": format!("Article {n}") }] } }
    })
}

pub fn launch_json(id: &str, name: &str, net: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "net": net,
        "status": { "name": status },
        "launch_service_provider": { "name": "SpaceX" },
        "rocket": { "configuration": { "name": "Falcon 9" } },
        "pad": { "location": { "name": "Cape Canaveral, FL, USA" } },
        "mission": { "description": format!("{name} mission") },
        "webcast_live": false,
        "vidURLs": []
    })
}
