// tests/launch_board.rs
//
// Countdown arithmetic, launch classification and the live ticker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};

use intel_dashboard::classify::{partition, KeywordTable, CONSTELLATION_CAP, MAJOR_CAP};
use intel_dashboard::countdown::{
    card_label, countdown, countdown_iso, days_until, CountdownTicker, Phase, StatusClass,
    MS_PER_DAY,
};
use intel_dashboard::ingest::normalize_launch;
use intel_dashboard::ingest::types::Launch;
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn launch(name: &str, mission: &str) -> Launch {
    normalize_launch(&json!({
        "id": name,
        "name": name,
        "net": "2025-06-10T00:00:00Z",
        "mission": { "description": mission }
    }))
}

#[test]
fn ninety_seconds_out() {
    let c = countdown(now() + chrono::Duration::seconds(90), now());
    assert_eq!((c.days, c.hours, c.minutes, c.seconds), (0, 0, 1, 30));
    assert!(!c.is_past);
    assert_eq!(c.phase(), Phase::Imminent);
}

#[test]
fn one_second_ago_is_past() {
    let c = countdown(now() - chrono::Duration::seconds(1), now());
    assert!(c.is_past);
    assert_eq!(c.phase(), Phase::Past);
    assert!(countdown_iso("not a date", now()).is_past);
}

#[test]
fn card_days_ceil_while_clock_floors() {
    let target = now() + chrono::Duration::milliseconds(MS_PER_DAY / 10);
    assert_eq!(days_until(target, now()), 1);
    assert_eq!(card_label(days_until(target, now())), "T-1d");
    assert_eq!(countdown(target, now()).digits(), "00:02:24:00");
}

#[test]
fn status_classes() {
    assert_eq!(StatusClass::of("Go for Launch"), StatusClass::Go);
    assert_eq!(StatusClass::of("To Be Determined (TBD)"), StatusClass::Tbd);
    assert_eq!(StatusClass::of("Launch Failure"), StatusClass::Failure);
    assert_eq!(StatusClass::of("Success"), StatusClass::Default);
    assert_eq!(StatusClass::of("To Be Confirmed (TBC)"), StatusClass::Tbd);
    assert_eq!(StatusClass::of("Scrubbed"), StatusClass::Failure);
}

#[test]
fn earlier_status_branches_win() {
    // "go" is checked before tbd/tbc and failure/scrub
    assert_eq!(StatusClass::of("Scrub, awaiting GO poll"), StatusClass::Go);
    assert_eq!(StatusClass::of("TBC after launch failure review"), StatusClass::Tbd);
}

#[test]
fn constellation_and_priority_tags() {
    let table = KeywordTable::default();
    let starlink = table.classify(&launch("Starlink Group 6-12", ""));
    assert!(starlink.is_constellation);

    let artemis = table.classify(&launch("Artemis II", ""));
    assert!(artemis.is_priority);
    assert!(!artemis.is_constellation);

    let cargo = table.classify(&launch("Cygnus NG-23", ""));
    assert!(!cargo.is_priority && !cargo.is_constellation);
}

#[test]
fn board_windows_are_capped_in_upstream_order() {
    let mut launches: Vec<Launch> = (0..8).map(|i| launch(&format!("Probe {i}"), "")).collect();
    launches.extend((0..5).map(|i| launch(&format!("Starlink Group {i}"), "")));

    let board = partition(&launches, &KeywordTable::default());
    assert_eq!(board.major.len(), MAJOR_CAP);
    assert_eq!(board.constellation.len(), CONSTELLATION_CAP);
    assert_eq!(board.major[0].0.name, "Probe 0");
    assert_eq!(board.constellation[2].0.name, "Starlink Group 2");
}

/// Wall clock that follows tokio's paused time.
fn paused_clock(start: DateTime<Utc>) -> intel_dashboard::countdown::Clock {
    let origin = tokio::time::Instant::now();
    Arc::new(move || {
        let elapsed = tokio::time::Instant::now() - origin;
        start + chrono::Duration::milliseconds(elapsed.as_millis() as i64)
    })
}

#[tokio::test(start_paused = true)]
async fn ticker_counts_down_and_finishes_once_past() {
    let start = now();
    let target = start + chrono::Duration::seconds(3);
    let ticker = CountdownTicker::spawn_with_clock(target, Duration::from_secs(1), paused_clock(start));
    let mut rx = ticker.subscribe();
    assert_eq!(ticker.current().seconds, 3);

    loop {
        rx.changed().await.expect("ticker alive");
        if rx.borrow_and_update().is_past {
            break;
        }
    }
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(ticker.is_finished());
}

#[tokio::test(start_paused = true)]
async fn stopping_the_ticker_closes_the_channel() {
    let start = now();
    let target = start + chrono::Duration::days(2);
    let ticker = CountdownTicker::spawn_with_clock(target, Duration::from_secs(1), paused_clock(start));
    let mut rx = ticker.subscribe();

    rx.changed().await.expect("first tick");
    ticker.stop();

    // Sender is dropped with the aborted task.
    assert!(rx.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_ticker_stops_it() {
    let start = now();
    let ticker = CountdownTicker::spawn_with_clock(
        start + chrono::Duration::hours(5),
        Duration::from_secs(1),
        paused_clock(start),
    );
    let mut rx = ticker.subscribe();
    drop(ticker);
    assert!(rx.changed().await.is_err());
}
