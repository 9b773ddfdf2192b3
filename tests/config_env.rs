// tests/config_env.rs
//
// Environment-driven configuration and keyword file loading. Tests that touch
// the process environment run serially.

use std::io::Write;

use serial_test::serial;

use intel_dashboard::config::keywords::load_keywords_from;
use intel_dashboard::config::{AppConfig, ENV_ARTICLES_TTL, ENV_DATABASE_ID_SPORT, ENV_NOTION_DATABASE_ID};
use intel_dashboard::ingest::types::Feed;

#[test]
#[serial]
fn env_overrides_ttl_and_sport_falls_back_to_generic() {
    std::env::set_var(ENV_ARTICLES_TTL, "60");
    std::env::set_var(ENV_NOTION_DATABASE_ID, "generic-db");
    std::env::remove_var(ENV_DATABASE_ID_SPORT);

    let cfg = AppConfig::from_env();
    assert_eq!(cfg.articles_ttl.as_secs(), 60);
    assert_eq!(cfg.databases.database_for(Feed::Sport), Some("generic-db"));

    std::env::remove_var(ENV_ARTICLES_TTL);
    std::env::remove_var(ENV_NOTION_DATABASE_ID);
}

#[test]
#[serial]
fn unparsable_ttl_keeps_default() {
    std::env::set_var(ENV_ARTICLES_TTL, "soon");
    let cfg = AppConfig::from_env();
    assert_eq!(cfg.articles_ttl, AppConfig::default().articles_ttl);
    std::env::remove_var(ENV_ARTICLES_TTL);
}

#[test]
fn keyword_file_replaces_seed_lists() {
    let mut f = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(f, "constellation = [\"Kuiper\"]\npriority = [\"Starship\"]").expect("write");

    let table = load_keywords_from(f.path()).expect("load");
    assert!(table.is_constellation("Project KUIPER batch 1"));
    assert!(!table.is_constellation("Starlink Group 4"));
    assert!(table.is_priority("Starship Flight 9", ""));
}
