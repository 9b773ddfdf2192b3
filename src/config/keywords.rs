// src/config/keywords.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::KeywordTable;

pub const DEFAULT_KEYWORDS_PATH: &str = "config/launch_keywords.toml";

/// Load the keyword table from an explicit TOML file.
pub fn load_keywords_from(path: &Path) -> Result<KeywordTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading launch keywords from {}", path.display()))?;
    parse_keywords(&content).with_context(|| format!("parsing {}", path.display()))
}

/// Resolve the keyword table:
/// 1) `explicit` path (from $LAUNCH_KEYWORDS_PATH), which must exist
/// 2) config/launch_keywords.toml
/// 3) built-in seed
pub fn load_keywords_default(explicit: Option<&Path>) -> Result<KeywordTable> {
    if let Some(p) = explicit {
        if !p.exists() {
            return Err(anyhow!(
                "LAUNCH_KEYWORDS_PATH points to non-existent path {}",
                p.display()
            ));
        }
        return load_keywords_from(p);
    }
    let fallback = PathBuf::from(DEFAULT_KEYWORDS_PATH);
    if fallback.exists() {
        return load_keywords_from(&fallback);
    }
    Ok(KeywordTable::default())
}

/// A missing section keeps the seed list for that category.
fn parse_keywords(s: &str) -> Result<KeywordTable> {
    #[derive(serde::Deserialize)]
    struct Raw {
        #[serde(default)]
        constellation: Option<Vec<String>>,
        #[serde(default)]
        priority: Option<Vec<String>>,
    }
    let raw: Raw = toml::from_str(s)?;
    let seed = KeywordTable::default();
    Ok(KeywordTable {
        constellation: raw
            .constellation
            .map(clean_list)
            .unwrap_or(seed.constellation),
        priority: raw.priority.map(clean_list).unwrap_or(seed.priority),
    })
}

/// Lowercase, trim, drop empties and duplicates; keeps first-seen order.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() && !out.contains(&t) {
            out.push(t);
        }
    }
    out
}
