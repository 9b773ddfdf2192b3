//! # Launch Classifier
//!
//! Tags a launch as a constellation deployment and/or a priority mission by
//! case-insensitive keyword matching, then splits a launch list into the two
//! display windows used by the space hub.
//!
//! The keyword sets are data ([`KeywordTable`]); the built-in seed can be
//! replaced from `config/launch_keywords.toml`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::ingest::types::Launch;

/// Non-constellation launches shown on the board.
pub const MAJOR_CAP: usize = 6;
/// Constellation launches shown on the board.
pub const CONSTELLATION_CAP: usize = 3;

const SEED_CONSTELLATION: &[&str] = &[
    "starlink",
    "oneweb",
    "group",
    "batch",
    "rideshare",
    "transporter",
    "dedicated",
    "smallsat",
];

const SEED_PRIORITY: &[&str] = &[
    "maiden",
    "test flight",
    "flight 1",
    "first flight",
    "artemis",
    "orion",
    "sls",
    "gateway",
    "lunar",
    "mars",
    "europa",
    "titan",
    "psyche",
    "crew",
    "crewed",
    "astronaut",
    "iss",
    "demo",
    "prototype",
    "experimental",
];

static DEFAULT_TABLE: Lazy<KeywordTable> = Lazy::new(KeywordTable::default);

/// Keyword sets per category. Entries are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub constellation: Vec<String>,
    pub priority: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            constellation: SEED_CONSTELLATION.iter().map(|s| s.to_string()).collect(),
            priority: SEED_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LaunchClass {
    pub is_constellation: bool,
    pub is_priority: bool,
}

impl KeywordTable {
    pub fn is_constellation(&self, name: &str) -> bool {
        contains_any(&name.to_lowercase(), &self.constellation)
    }

    pub fn is_priority(&self, name: &str, mission: &str) -> bool {
        let name = name.to_lowercase();
        let mission = mission.to_lowercase();
        self.priority
            .iter()
            .any(|kw| name.contains(kw.as_str()) || mission.contains(kw.as_str()))
    }

    pub fn classify(&self, launch: &Launch) -> LaunchClass {
        LaunchClass {
            is_constellation: self.is_constellation(&launch.name),
            is_priority: self.is_priority(&launch.name, &launch.mission),
        }
    }
}

fn contains_any(haystack: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw.as_str()))
}

/// Classify with the built-in keyword table.
pub fn classify(launch: &Launch) -> LaunchClass {
    DEFAULT_TABLE.classify(launch)
}

/// Launch list split into the two display windows, upstream order kept.
#[derive(Debug, Clone, Default)]
pub struct LaunchBoard<'a> {
    pub major: Vec<(&'a Launch, LaunchClass)>,
    pub constellation: Vec<(&'a Launch, LaunchClass)>,
}

pub fn partition<'a>(launches: &'a [Launch], table: &KeywordTable) -> LaunchBoard<'a> {
    let mut board = LaunchBoard::default();
    for launch in launches {
        let class = table.classify(launch);
        if class.is_constellation {
            if board.constellation.len() < CONSTELLATION_CAP {
                board.constellation.push((launch, class));
            }
        } else if board.major.len() < MAJOR_CAP {
            board.major.push((launch, class));
        }
    }
    board
}
