// src/ingest/providers/notion.rs
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::GatewayError;
use crate::ingest::types::{PageSource, QueryPage};
use crate::ingest::PAGE_SIZE;

pub const NOTION_VERSION: &str = "2022-06-28";

/// Notion database query client (`POST /databases/{id}/query`).
pub struct NotionClient {
    http: reqwest::Client,
    base: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct Sort<'a> {
    property: &'a str,
    direction: &'a str,
}

#[derive(Serialize)]
struct QueryBody<'a> {
    sorts: [Sort<'a>; 1],
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

impl NotionClient {
    pub fn new(base: impl Into<String>, token: Option<String>) -> Result<Self, GatewayError> {
        Ok(Self {
            http: super::http_client("Intelligence-Dashboard/1.0")?,
            base: base.into(),
            token,
        })
    }
}

#[async_trait]
impl PageSource for NotionClient {
    async fn query_page(
        &self,
        database_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, GatewayError> {
        let token = self
            .token
            .as_deref()
            .ok_or(GatewayError::MissingConfig("NOTION_TOKEN"))?;

        let body = QueryBody {
            sorts: [Sort {
                property: "Date",
                direction: "descending",
            }],
            page_size: PAGE_SIZE,
            start_cursor: cursor,
        };

        let url = format!("{}/databases/{}/query", self.base, database_id);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        let v: Value = resp.json().await?;
        QueryPage::from_value(v)
    }

    fn name(&self) -> &'static str {
        "notion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_omits_cursor() {
        let body = QueryBody {
            sorts: [Sort {
                property: "Date",
                direction: "descending",
            }],
            page_size: PAGE_SIZE,
            start_cursor: None,
        };
        let v = serde_json::to_value(&body).unwrap();
        assert!(v.get("start_cursor").is_none());
        assert_eq!(v["sorts"][0]["direction"], "descending");
        assert_eq!(v["page_size"], 100);
    }

    #[tokio::test]
    async fn missing_token_is_a_config_error() {
        let c = NotionClient::new("http://127.0.0.1:9", None).unwrap();
        let err = c.query_page("db", None).await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingConfig("NOTION_TOKEN")));
    }
}
