//! Hub view: one parameterized dashboard payload for both hubs.
//!
//! Built from the full article list (options and trending never see the
//! filter) plus, on the space hub, the classified launch board.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::classify::{partition, KeywordTable, LaunchClass};
use crate::countdown::{
    constellation_label, card_label, countdown_iso, days_until, format_card_date, parse_target,
    status_text, Countdown, StatusClass,
};
use crate::filter::{apply_filters, high_priority_count, unique_values, FilterState};
use crate::ingest::types::{Article, Facet, Hub, Launch};
use crate::trending::{top_facet_values, TrendingEntry, TRENDING_LIMIT};

/// Facet ranked in the trending strip.
pub const TRENDING_FACET: Facet = Facet::Topic;

#[derive(Debug, Serialize)]
pub struct HubView<'a> {
    pub hub: Hub,
    /// Articles after filtering.
    pub total: usize,
    /// Articles in the feed before filtering.
    pub feed_total: usize,
    pub high_priority: usize,
    /// High-priority share of the filtered list, in whole percent.
    pub high_priority_pct: u32,
    pub articles: Vec<&'a Article>,
    pub options: BTreeMap<Facet, Vec<String>>,
    pub trending: Vec<TrendingEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launches: Option<LaunchBoardView>,
    pub errors: Vec<String>,
}

pub fn build_view<'a>(hub: Hub, articles: &'a [Article], state: &FilterState) -> HubView<'a> {
    let visible = apply_filters(articles, state);
    let options = hub
        .filter_facets()
        .iter()
        .map(|f| (*f, unique_values(articles, *f)))
        .collect();

    let high_priority = high_priority_count(visible.iter().copied());

    HubView {
        hub,
        total: visible.len(),
        feed_total: articles.len(),
        high_priority,
        high_priority_pct: percent(high_priority, visible.len()),
        articles: visible,
        options,
        trending: top_facet_values(articles, TRENDING_FACET, TRENDING_LIMIT),
        launches: None,
        errors: Vec::new(),
    }
}

/// Rounded `part / whole` in percent; an empty whole is 0.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 * 100.0 / whole as f64).round() as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchCard {
    #[serde(flatten)]
    pub launch: Launch,
    #[serde(flatten)]
    pub class: LaunchClass,
    pub days_until: Option<i64>,
    pub label: String,
    pub date_label: Option<String>,
    pub status_class: StatusClass,
    pub status_label: String,
    pub countdown: Countdown,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LaunchBoardView {
    /// First entry is the featured launch.
    pub major: Vec<LaunchCard>,
    pub constellation: Vec<LaunchCard>,
}

fn card(launch: &Launch, class: LaunchClass, now: DateTime<Utc>, constellation: bool) -> LaunchCard {
    let target = parse_target(&launch.date);
    let days = target.map(|t| days_until(t, now));
    let label = match (days, constellation) {
        (Some(d), true) => constellation_label(d),
        (Some(d), false) => card_label(d),
        (None, _) => "TBD".to_string(),
    };
    LaunchCard {
        launch: launch.clone(),
        class,
        days_until: days,
        label,
        date_label: target.map(format_card_date),
        status_class: StatusClass::of(&launch.status),
        status_label: status_text(&launch.status).to_string(),
        countdown: countdown_iso(&launch.date, now),
    }
}

pub fn launch_board_view(launches: &[Launch], table: &KeywordTable, now: DateTime<Utc>) -> LaunchBoardView {
    let board = partition(launches, table);
    LaunchBoardView {
        major: board
            .major
            .into_iter()
            .map(|(l, c)| card(l, c, now, false))
            .collect(),
        constellation: board
            .constellation
            .into_iter()
            .map(|(l, c)| card(l, c, now, true))
            .collect(),
    }
}
