// src/ingest/types.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// Which topical hub a record belongs to. Decides the facet schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hub {
    Sport,
    Space,
}

impl Hub {
    /// Facets offered as filters on this hub, in display order.
    pub fn filter_facets(self) -> &'static [Facet] {
        match self {
            Hub::Sport => &[Facet::Region, Facet::Sport, Facet::Topic, Facet::Priority],
            Hub::Space => &[Facet::Agency, Facet::Mission, Facet::Priority],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Hub::Sport => "sport",
            Hub::Space => "space",
        }
    }

    /// Article feed that backs the hub view.
    pub fn feed(self) -> Feed {
        match self {
            Hub::Sport => Feed::Sport,
            Hub::Space => Feed::Space,
        }
    }
}

/// One article database in the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    Generic,
    Sport,
    Space,
}

impl Feed {
    pub fn hub(self) -> Hub {
        match self {
            Feed::Generic | Feed::Sport => Hub::Sport,
            Feed::Space => Hub::Space,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feed::Generic => "generic",
            Feed::Sport => "sport",
            Feed::Space => "space",
        }
    }
}

/// Categorical field used for filtering and trending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Region,
    Sport,
    Topic,
    Agency,
    Mission,
    Priority,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Region,
        Facet::Sport,
        Facet::Topic,
        Facet::Agency,
        Facet::Mission,
        Facet::Priority,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Region => "region",
            Facet::Sport => "sport",
            Facet::Topic => "topic",
            Facet::Agency => "agency",
            Facet::Mission => "mission",
            Facet::Priority => "priority",
        }
    }

    pub fn parse(name: &str) -> Option<Facet> {
        Facet::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

/// Normalized article. Hub facets are serialized flat next to the common fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String, // ISO-8601 or ""
    pub link: String,
    pub priority: String, // e.g. "🔴 High"
    #[serde(flatten)]
    pub facets: HubFacets,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HubFacets {
    Sport {
        sport: String,
        topic: String,
        region: String,
    },
    Space {
        agency: String,
        mission: String,
        topic: String,
    },
}

impl Article {
    pub fn hub(&self) -> Hub {
        match self.facets {
            HubFacets::Sport { .. } => Hub::Sport,
            HubFacets::Space { .. } => Hub::Space,
        }
    }

    /// Value of `facet` on this article, `None` when the hub has no such facet.
    pub fn facet(&self, facet: Facet) -> Option<&str> {
        match (facet, &self.facets) {
            (Facet::Priority, _) => Some(&self.priority),
            (Facet::Topic, HubFacets::Sport { topic, .. })
            | (Facet::Topic, HubFacets::Space { topic, .. }) => Some(topic),
            (Facet::Sport, HubFacets::Sport { sport, .. }) => Some(sport),
            (Facet::Region, HubFacets::Sport { region, .. }) => Some(region),
            (Facet::Agency, HubFacets::Space { agency, .. }) => Some(agency),
            (Facet::Mission, HubFacets::Space { mission, .. }) => Some(mission),
            _ => None,
        }
    }
}

/// Normalized upcoming launch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Launch {
    pub id: String,
    pub name: String,
    pub date: String, // NET, ISO-8601
    pub rocket: String,
    pub agency: String,
    pub location: String,
    pub mission: String,
    pub status: String,
    pub webcast: bool,
    pub livestream: Option<String>,
    pub image: Option<String>,
    pub probability: Option<u8>,
}

/// One page of a database query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPage {
    pub results: Vec<Value>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

impl QueryPage {
    /// Parse the raw query response. `results` must be an array; the cursor
    /// fields default to "no more pages".
    pub fn from_value(v: Value) -> Result<Self, GatewayError> {
        let Value::Object(mut obj) = v else {
            return Err(GatewayError::Malformed("query response is not an object".into()));
        };
        let results = match obj.remove("results") {
            Some(Value::Array(items)) => items,
            _ => return Err(GatewayError::Malformed("query response has no results array".into())),
        };
        let has_more = obj.get("has_more").and_then(Value::as_bool).unwrap_or(false);
        let next_cursor = obj
            .get("next_cursor")
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Ok(Self {
            results,
            has_more,
            next_cursor,
        })
    }
}

/// Paginated document-database query (the content store).
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page sorted by `Date` descending, starting at `cursor`.
    async fn query_page(
        &self,
        database_id: &str,
        cursor: Option<&str>,
    ) -> Result<QueryPage, GatewayError>;
    fn name(&self) -> &'static str;
}

/// Upcoming-launch REST feed. Returns the raw JSON body.
#[async_trait::async_trait]
pub trait LaunchSource: Send + Sync {
    async fn fetch_upcoming(&self, limit: usize) -> Result<Value, GatewayError>;
    fn name(&self) -> &'static str;
}
