// tests/filter_engine.rs
//
// Filtering, options and trending over normalized articles.

mod common;

use serde_json::json;

use common::sport_page;
use intel_dashboard::filter::{apply_filters, records_or_empty, unique_values, FilterState, ALL};
use intel_dashboard::ingest::normalize_article;
use intel_dashboard::ingest::types::{Article, Facet, Hub};
use intel_dashboard::trending::{top_facet_values, TrendingEntry};

fn corpus() -> Vec<Article> {
    [
        ("1", "Club finance report", "Europe", "Football", "Finance", "🔴 High"),
        ("2", "Grand slam rights", "Europe", "Tennis", "Media Rights", "🟡 Medium"),
        ("3", "Open sponsorship", "North America", "Tennis", "Sponsorship", "🟢 Low"),
        ("4", "Tennis tour budget", "Europe", "Tennis", "Finance", "🔴 High"),
    ]
    .iter()
    .map(|(id, title, region, sport, topic, prio)| {
        normalize_article(&sport_page(id, title, region, sport, topic, prio), Hub::Sport)
    })
    .collect()
}

fn ids(v: &[&Article]) -> Vec<String> {
    v.iter().map(|a| a.id.clone()).collect()
}

#[test]
fn facets_compose_with_and() {
    let arts = corpus();
    let state = FilterState::new()
        .with_facet(Facet::Region, "Europe")
        .with_facet(Facet::Sport, "Tennis");
    assert_eq!(ids(&apply_filters(&arts, &state)), vec!["2", "4"]);
}

#[test]
fn all_selection_is_no_constraint() {
    let arts = corpus();
    let state = FilterState::new().with_facet(Facet::Region, ALL);
    assert_eq!(apply_filters(&arts, &state).len(), arts.len());
}

#[test]
fn search_is_case_insensitive_over_title_and_description() {
    let arts = corpus();
    let hit = FilterState::new().with_search("FINANCE");
    assert_eq!(ids(&apply_filters(&arts, &hit)), vec!["1"]);

    // description is "About <title>"
    let desc = FilterState::new().with_search("about open");
    assert_eq!(ids(&apply_filters(&arts, &desc)), vec!["3"]);
}

#[test]
fn query_map_builds_the_same_state() {
    let q = [("region", "Europe"), ("SPORT", "Tennis"), ("q", "budget"), ("page", "2")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let state = FilterState::from_query(&q);
    let arts = corpus();
    assert_eq!(ids(&apply_filters(&arts, &state)), vec!["4"]);
}

#[test]
fn error_payload_is_an_empty_list() {
    let arts: Vec<Article> = records_or_empty(json!({ "error": "Failed to fetch articles from Notion" }));
    assert!(arts.is_empty());
    assert!(apply_filters(&arts, &FilterState::new()).is_empty());
}

#[test]
fn options_start_with_all_in_first_seen_order() {
    let arts = corpus();
    assert_eq!(
        unique_values(&arts, Facet::Sport),
        vec!["all", "Football", "Tennis"]
    );
    assert_eq!(
        unique_values(&arts, Facet::Region),
        vec!["all", "Europe", "North America"]
    );
}

#[test]
fn trending_ties_keep_first_seen_order() {
    let arts: Vec<Article> = ["A", "C", "B", "A", "B"]
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            let page = sport_page(&i.to_string(), "t", "Global", "Golf", topic, "🟢 Low");
            normalize_article(&page, Hub::Sport)
        })
        .collect();
    assert_eq!(
        top_facet_values(&arts, Facet::Topic, 2),
        vec![TrendingEntry::new("A", 2), TrendingEntry::new("B", 2)]
    );
}
