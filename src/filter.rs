//! # Filter Engine
//!
//! Pure functions over a record list and an immutable [`FilterState`]:
//! - facet predicates (`all` or exact value), ANDed together,
//! - free-text search over title + description (case-insensitive, empty = no-op),
//! - order is always preserved.
//!
//! Also hosts the small priority helpers the hub header uses.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::ingest::types::{Article, Facet};

/// Sentinel meaning "no restriction on this facet".
pub const ALL: &str = "all";

/// Anything the engine can filter.
pub trait Faceted {
    fn facet(&self, facet: Facet) -> Option<&str>;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
}

impl Faceted for Article {
    fn facet(&self, facet: Facet) -> Option<&str> {
        Article::facet(self, facet)
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Value(String),
}

impl Selection {
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() || raw == ALL {
            Selection::All
        } else {
            Selection::Value(raw.to_string())
        }
    }

    /// A missing facet value only matches `All`.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selection::All => true,
            Selection::Value(want) => value == Some(want.as_str()),
        }
    }
}

/// Current filter selections. Built once per request; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    facets: BTreeMap<Facet, Selection>,
    search: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facet(mut self, facet: Facet, value: impl AsRef<str>) -> Self {
        match Selection::parse(value.as_ref()) {
            Selection::All => {
                self.facets.remove(&facet);
            }
            sel => {
                self.facets.insert(facet, sel);
            }
        }
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Query parameters → state. Facet names are matched case-insensitively;
    /// an exact lowercase key wins over other spellings, then the smallest key.
    /// `search` wins over `q`. Unknown keys are ignored.
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let mut keys: Vec<&String> = params.keys().collect();
        keys.sort();

        let mut state = Self::new();
        for facet in Facet::ALL {
            let value = params.get(facet.as_str()).or_else(|| {
                keys.iter()
                    .find(|k| Facet::parse(k) == Some(facet))
                    .and_then(|k| params.get(k.as_str()))
            });
            if let Some(v) = value {
                state = state.with_facet(facet, v);
            }
        }
        state.search = params
            .get("search")
            .or_else(|| params.get("q"))
            .cloned()
            .unwrap_or_default();
        state
    }

    pub fn selection(&self, facet: Facet) -> &Selection {
        static ALL_SEL: Selection = Selection::All;
        self.facets.get(&facet).unwrap_or(&ALL_SEL)
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Facets with a concrete (non-`all`) selection.
    pub fn active_facets(&self) -> impl Iterator<Item = (Facet, &str)> {
        self.facets.iter().filter_map(|(f, s)| match s {
            Selection::Value(v) => Some((*f, v.as_str())),
            Selection::All => None,
        })
    }

    pub fn matches<R: Faceted + ?Sized>(&self, record: &R) -> bool {
        self.facets
            .iter()
            .all(|(facet, sel)| sel.matches(record.facet(*facet)))
            && matches_search(record, &self.search)
    }
}

fn matches_search<R: Faceted + ?Sized>(record: &R, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    record.title().to_lowercase().contains(&needle)
        || record.description().to_lowercase().contains(&needle)
}

/// Records matching every active predicate, in input order.
pub fn apply_filters<'a, R: Faceted>(records: &'a [R], state: &FilterState) -> Vec<&'a R> {
    records.iter().filter(|r| state.matches(*r)).collect()
}

/// Coerce a feed payload to a record list. Anything that is not a JSON array
/// (an `{"error": ..}` body, `null`) becomes empty; undecodable items are skipped.
pub fn records_or_empty<T: DeserializeOwned>(payload: Value) -> Vec<T> {
    match payload {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|it| serde_json::from_value(it).ok())
            .collect(),
        other => {
            tracing::debug!(target: "filter", kind = value_kind(&other), "non-sequence payload treated as empty");
            Vec::new()
        }
    }
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Selectable options for a facet: `"all"` first, then distinct values in first-seen order.
pub fn unique_values<R: Faceted>(records: &[R], facet: Facet) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = vec![ALL.to_string()];
    for v in records.iter().filter_map(|r| r.facet(facet)) {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    pub fn of(priority: &str) -> Self {
        if priority.contains("High") || priority.contains('🔴') {
            PriorityLevel::High
        } else if priority.contains("Medium") || priority.contains('🟡') {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }
}

/// `"🔴 High"` → `"High"`.
pub fn priority_label(priority: &str) -> &str {
    ["🔴 ", "🟡 ", "🟢 "]
        .iter()
        .find_map(|p| priority.strip_prefix(p))
        .unwrap_or(priority)
}

pub fn high_priority_count<'a, R, I>(records: I) -> usize
where
    R: Faceted + 'a,
    I: IntoIterator<Item = &'a R>,
{
    records
        .into_iter()
        .filter(|r| {
            r.facet(Facet::Priority)
                .is_some_and(|p| PriorityLevel::of(p) == PriorityLevel::High)
        })
        .count()
}
