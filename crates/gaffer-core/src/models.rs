//! Shared data models for the gaffer bot
//!
//! Key concepts:
//! - `ServerConfig`: the one durable record, a Discord server's league and
//!   target channel, keyed by server id in the settings store

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Server configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Per-server bot configuration, written by `/setup`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// FPL classic league id to report on
    pub league_id: u64,
    /// Discord channel id scheduled posts go to
    pub channel_id: u64,
}
