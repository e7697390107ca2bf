//! Typed payloads for the FPL public API
//!
//! Key concepts:
//! - `Bootstrap`: the `/bootstrap-static/` snapshot (players + gameweek events)
//! - `LeagueStandings`: one page of a classic league table
//! - `EntryPicks`: a manager's squad picks for one gameweek
//! - `TransferRecord`: one transfer made by a manager
//!
//! Only the fields the bot reads are modeled; everything else in the
//! responses is ignored.

use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Bootstrap (players + gameweeks)
// ─────────────────────────────────────────────────────────────────────────────

/// One gameweek in the bootstrap event list
#[derive(Debug, Clone, Deserialize)]
pub struct GameweekEvent {
    pub id: u32,
    #[serde(default)]
    pub is_current: bool,
}

/// One player in the bootstrap element list
///
/// `now_cost` is integer tenths of a million; display divides by 10.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    pub id: u32,
    pub web_name: String,
    pub now_cost: u32,
    pub status: String,
}

/// `/bootstrap-static/` response
#[derive(Debug, Clone, Deserialize)]
pub struct Bootstrap {
    pub events: Vec<GameweekEvent>,
    pub elements: Vec<Element>,
}

impl Bootstrap {
    /// The gameweek flagged current, or 1 when none is flagged
    pub fn current_gameweek(&self) -> u32 {
        self.events
            .iter()
            .find(|e| e.is_current)
            .map(|e| e.id)
            .unwrap_or(1)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// League standings
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueInfo {
    pub id: u64,
    pub name: String,
}

/// One row of a classic league table
#[derive(Debug, Clone, Deserialize)]
pub struct StandingEntry {
    /// Manager (entry) id, used for picks/transfers lookups
    pub entry: u64,
    /// Team display name
    pub entry_name: String,
    /// Manager display name
    pub player_name: String,
    pub rank: u32,
    pub total: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsPage {
    pub results: Vec<StandingEntry>,
}

/// `/leagues-classic/{id}/standings/` response (first page only)
#[derive(Debug, Clone, Deserialize)]
pub struct LeagueStandings {
    pub league: LeagueInfo,
    pub standings: StandingsPage,
}

// ─────────────────────────────────────────────────────────────────────────────
// Manager picks
// ─────────────────────────────────────────────────────────────────────────────

/// One squad pick within a manager's gameweek team
#[derive(Debug, Clone, Deserialize)]
pub struct Pick {
    /// Player (element) id
    pub element: u32,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_vice_captain: bool,
}

/// `/entry/{id}/event/{gw}/picks/` response
#[derive(Debug, Clone, Deserialize)]
pub struct EntryPicks {
    pub picks: Vec<Pick>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Manager transfers
// ─────────────────────────────────────────────────────────────────────────────

/// One row of `/entry/{id}/transfers/`
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRecord {
    pub entry: u64,
    pub element_in: u32,
    pub element_out: u32,
    pub event: u32,
}
