// src/ingest/providers/launch_library.rs
use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;
use crate::ingest::types::LaunchSource;

/// Launch Library 2 upcoming-launch feed (`GET /launch/upcoming/?limit=N`).
pub struct LaunchLibraryClient {
    http: reqwest::Client,
    base: String,
}

impl LaunchLibraryClient {
    pub fn new(base: impl Into<String>) -> Result<Self, GatewayError> {
        Ok(Self {
            http: super::http_client("Intelligence-Dashboard/1.0")?,
            base: base.into(),
        })
    }

    pub fn upcoming_url(&self, limit: usize) -> String {
        format!("{}/launch/upcoming/?limit={}", self.base, limit)
    }
}

#[async_trait]
impl LaunchSource for LaunchLibraryClient {
    async fn fetch_upcoming(&self, limit: usize) -> Result<Value, GatewayError> {
        let resp = self.http.get(self.upcoming_url(limit)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(resp.json().await?)
    }

    fn name(&self) -> &'static str {
        "launch-library"
    }
}
