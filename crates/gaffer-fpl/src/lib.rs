//! Gaffer FPL - Typed client and aggregators for the FPL public API
//!
//! This crate wraps the public Fantasy Premier League REST endpoints in
//! typed accessors and combines them into the summaries the bot posts.

pub mod client;
pub mod models;
pub mod players;
pub mod summary;

pub use client::{FplClient, FplClientConfig, FPL_API_URL};
pub use models::{
    Bootstrap, Element, EntryPicks, GameweekEvent, LeagueStandings, Pick, StandingEntry,
    TransferRecord,
};
pub use players::{PlayerIndex, PlayerInfo};
pub use summary::{
    captain_summary, current_gameweek, transfer_summary, CaptainRow, CaptainSummary,
    SummaryOptions, TransferRow, TransferSummary,
};
