// src/ingest/providers/mod.rs
pub mod launch_library;
pub mod notion;

use std::time::Duration;

/// Shared reqwest client setup for upstream calls.
pub(crate) fn http_client(user_agent: &str) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(15))
        .build()
}
