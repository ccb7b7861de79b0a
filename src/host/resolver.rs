//! JSON-backed territory registry.
//!
//! Reads the public territory list shape:
//! `{ "Detlas": { "guild": { "name": ..., "prefix": ... }, "acquired": "2026-03-01T18:00:00Z" } }`
//! Only `acquired` matters here; other keys are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::common::resources::DEFAULT_COOLDOWN_SECONDS;
use crate::common::types::same_territory;
use crate::engine::clock::Clock;
use crate::host::{TerritoryResolver, TerritoryStatus};

#[derive(Debug, Clone, Deserialize)]
struct TerritoryEntry {
    #[serde(default)]
    acquired: Option<DateTime<Utc>>,
}

/// Registry loaded once from disk, with an operator-set player position.
pub struct StaticTerritoryResolver {
    territories: BTreeMap<String, TerritoryEntry>,
    current: Option<String>,
    clock: Box<dyn Clock>,
}

impl StaticTerritoryResolver {
    /// Load the registry, degrading to an empty one on any error.
    pub fn load(path: impl AsRef<Path>, clock: Box<dyn Clock>) -> Self {
        let path = path.as_ref();
        let territories = match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(territories) => territories,
                Err(e) => {
                    warn!("Malformed territory registry {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) => {
                warn!("Could not read territory registry {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        info!("Loaded {} territories", territories.len());

        Self {
            territories,
            current: None,
            clock,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    fn entry(&self, name: &str) -> Option<&TerritoryEntry> {
        self.territories.get(name).or_else(|| {
            self.territories
                .iter()
                .find(|(key, _)| same_territory(key, name))
                .map(|(_, entry)| entry)
        })
    }
}

impl TerritoryResolver for StaticTerritoryResolver {
    fn current_territory_name(&self) -> Option<String> {
        self.current.clone()
    }

    fn all_territory_names(&self) -> Vec<String> {
        self.territories.keys().cloned().collect()
    }

    fn territory_status(&self, name: &str) -> Option<TerritoryStatus> {
        let acquired = self.entry(name)?.acquired?;
        let time_held_millis = (self.clock.now() - acquired).num_milliseconds().max(0);

        Some(TerritoryStatus {
            is_on_cooldown: time_held_millis < DEFAULT_COOLDOWN_SECONDS * 1000,
            time_held_millis,
        })
    }

    fn set_current_territory(&mut self, name: Option<String>) -> bool {
        self.current = name.map(|name| {
            match_territory_name(&name, &self.all_territory_names())
                .unwrap_or_else(|| name.trim().to_string())
        });
        true
    }
}

/// Resolve free text to a canonical territory name.
///
/// Exact case-insensitive matches win. Otherwise the shortest canonical name
/// containing the text is used, then the longest canonical name contained in
/// the text.
pub fn match_territory_name(text: &str, names: &[String]) -> Option<String> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(exact) = names.iter().find(|name| name.to_lowercase() == needle) {
        return Some(exact.clone());
    }

    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&needle))
        .min_by_key(|name| name.len())
        .or_else(|| {
            names
                .iter()
                .filter(|name| !name.is_empty() && needle.contains(&name.to_lowercase()))
                .max_by_key(|name| name.len())
        })
        .cloned()
}
