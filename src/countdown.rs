//! # Countdown
//! Launch-time arithmetic for the space hub.
//!
//! Two deliberately different views of "time left":
//! - [`countdown`] floors into days/hours/minutes/seconds (the live featured clock),
//! - [`days_until`] is a ceiling day count (compact cards, changes once a day).
//!
//! Near a day boundary they disagree: 0.1 day left is `T-1d` on a card but
//! `00:02:24:00` on the live clock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_past: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Future,
    /// Less than a day to go.
    Imminent,
    Past,
}

impl Countdown {
    /// Digits are meaningless once past; callers render a "passed" state.
    pub fn past() -> Self {
        Self {
            is_past: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_past {
            Phase::Past
        } else if self.days == 0 {
            Phase::Imminent
        } else {
            Phase::Future
        }
    }

    /// `DD:HH:MM:SS`, zero-padded.
    pub fn digits(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

pub fn countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let diff = (target - now).num_milliseconds();
    if diff <= 0 {
        return Countdown::past();
    }
    Countdown {
        days: diff / MS_PER_DAY,
        hours: (diff % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (diff % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (diff % MS_PER_MINUTE) / MS_PER_SECOND,
        is_past: false,
    }
}

/// Unparseable targets count as past.
pub fn countdown_iso(target_iso: &str, now: DateTime<Utc>) -> Countdown {
    match parse_target(target_iso) {
        Some(t) => countdown(t, now),
        None => Countdown::past(),
    }
}

/// RFC 3339 timestamps, or a bare `YYYY-MM-DD` read as midnight UTC.
pub fn parse_target(iso: &str) -> Option<DateTime<Utc>> {
    let s = iso.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `ceil((target - now) / 1 day)`.
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff = (target - now).num_milliseconds();
    let q = diff.div_euclid(MS_PER_DAY);
    if diff.rem_euclid(MS_PER_DAY) != 0 {
        q + 1
    } else {
        q
    }
}

/// Launch card badge: `T-3d`, `TODAY`, `PASSED`.
pub fn card_label(days: i64) -> String {
    match days {
        d if d > 0 => format!("T-{d}d"),
        0 => "TODAY".to_string(),
        _ => "PASSED".to_string(),
    }
}

/// Constellation row badge: `T-3d` or `NOW`.
pub fn constellation_label(days: i64) -> String {
    if days > 0 {
        format!("T-{days}d")
    } else {
        "NOW".to_string()
    }
}

/// `"Mar 5 UTC"`.
pub fn format_card_date(target: DateTime<Utc>) -> String {
    target.format("%b %-d UTC").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Go,
    Tbd,
    Failure,
    Default,
}

impl StatusClass {
    /// First match wins, in the order go → tbd/tbc → failure/scrub.
    pub fn of(status: &str) -> Self {
        let s = status.to_lowercase();
        if s.contains("go") {
            StatusClass::Go
        } else if s.contains("tbd") || s.contains("tbc") {
            StatusClass::Tbd
        } else if s.contains("failure") || s.contains("scrub") {
            StatusClass::Failure
        } else {
            StatusClass::Default
        }
    }
}

/// Status text as displayed; empty becomes `PENDING`.
pub fn status_text(status: &str) -> &str {
    if status.trim().is_empty() {
        "PENDING"
    } else {
        status
    }
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Periodic countdown recomputation, published through a watch channel.
///
/// The task stops on its own once the target has passed. `stop()` or dropping
/// the handle aborts it.
pub struct CountdownTicker {
    rx: watch::Receiver<Countdown>,
    task: JoinHandle<()>,
}

impl CountdownTicker {
    pub fn spawn(target: DateTime<Utc>, period: Duration) -> Self {
        Self::spawn_with_clock(target, period, Arc::new(Utc::now))
    }

    pub fn spawn_with_clock(target: DateTime<Utc>, period: Duration, clock: Clock) -> Self {
        let (tx, rx) = watch::channel(countdown(target, clock()));
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let c = countdown(target, clock());
                if tx.send(c).is_err() {
                    break;
                }
                if c.is_past {
                    tracing::debug!(target: "countdown", at = %target, "target reached, ticker done");
                    break;
                }
            }
        });
        Self { rx, task }
    }

    pub fn current(&self) -> Countdown {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
