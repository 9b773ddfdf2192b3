//! # Trending
//! Frequency of facet values over the full (unfiltered) record set.
//!
//! Counting keeps first-seen order; ranking is a stable sort by count, so
//! values with equal counts stay in the order they first appeared.

use serde::Serialize;
use std::collections::HashMap;

use crate::filter::Faceted;
use crate::ingest::types::Facet;

/// Entries shown in a hub's trending strip.
pub const TRENDING_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendingEntry {
    pub value: String,
    pub count: usize,
}

impl TrendingEntry {
    pub fn new(value: impl Into<String>, count: usize) -> Self {
        Self {
            value: value.into(),
            count,
        }
    }
}

/// Occurrences of each non-empty value of `facet`, in first-seen order.
pub fn facet_counts<R: Faceted>(records: &[R], facet: Facet) -> Vec<TrendingEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<TrendingEntry> = Vec::new();

    for v in records.iter().filter_map(|r| r.facet(facet)) {
        if v.is_empty() {
            continue;
        }
        match index.get(v) {
            Some(&i) => out[i].count += 1,
            None => {
                index.insert(v, out.len());
                out.push(TrendingEntry::new(v, 1));
            }
        }
    }
    out
}

/// Top `n` values by count, ties broken by first-seen order.
pub fn top_facet_values<R: Faceted>(records: &[R], facet: Facet, n: usize) -> Vec<TrendingEntry> {
    let mut counts = facet_counts(records, facet);
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}
