//! In-memory player index over a bootstrap snapshot
//!
//! Built once per snapshot. Preserves upstream element order so substring
//! search answers the first listed match, the behavior the legacy price
//! command depends on.

use crate::models::{Bootstrap, Element};
use std::collections::HashMap;

/// One player from the bootstrap snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: u32,
    pub name: String,
    /// Integer tenths of a million
    pub now_cost: u32,
    pub status: String,
}

impl PlayerInfo {
    /// Price rendered to one decimal, e.g. `now_cost` 130 -> "13.0"
    pub fn price_display(&self) -> String {
        format!("{}.{}", self.now_cost / 10, self.now_cost % 10)
    }
}

impl From<&Element> for PlayerInfo {
    fn from(e: &Element) -> Self {
        Self {
            id: e.id,
            name: e.web_name.clone(),
            now_cost: e.now_cost,
            status: e.status.clone(),
        }
    }
}

/// Player lookup index: by id and by display-name substring
#[derive(Debug, Default)]
pub struct PlayerIndex {
    players: Vec<PlayerInfo>,
    by_id: HashMap<u32, usize>,
}

impl PlayerIndex {
    /// Build the index from a bootstrap snapshot
    pub fn from_bootstrap(bootstrap: &Bootstrap) -> Self {
        let players: Vec<PlayerInfo> = bootstrap.elements.iter().map(PlayerInfo::from).collect();
        let by_id = players
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id, i))
            .collect();

        Self { players, by_id }
    }

    pub fn get(&self, id: u32) -> Option<&PlayerInfo> {
        self.by_id.get(&id).map(|&i| &self.players[i])
    }

    /// Display name for a player id
    pub fn name_of(&self, id: u32) -> Option<&str> {
        self.get(id).map(|p| p.name.as_str())
    }

    /// Case-insensitive substring search, first match in upstream order
    pub fn find_by_name(&self, query: &str) -> Option<&PlayerInfo> {
        let needle = query.to_lowercase();
        self.players
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
