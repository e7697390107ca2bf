//! Pure formatting of summaries into embed payloads
//!
//! Presenters build a plain `EmbedPayload` so rendering stays unit
//! testable; `to_create_embed` is the single serenity touchpoint.

use chrono::{DateTime, Utc};
use gaffer_fpl::{CaptainSummary, PlayerInfo, StandingEntry, TransferSummary};
use poise::serenity_prelude as serenity;

/// Embed colors, one per summary kind
pub const STANDINGS_COLOR: u32 = 0x1abc9c;
pub const CAPTAINS_COLOR: u32 = 0xf1c40f;
pub const TRANSFERS_COLOR: u32 = 0x3498db;

/// Standings embeds show at most this many rows
pub const STANDINGS_LIMIT: usize = 10;

/// Reply for a price lookup that matched nothing
pub const PRICE_NOT_FOUND: &str = "Player not found.";

/// One (heading, body) pair of an embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub heading: String,
    pub body: String,
}

/// Chat-platform-agnostic embed payload
#[derive(Debug, Clone)]
pub struct EmbedPayload {
    pub title: String,
    pub color: u32,
    pub timestamp: DateTime<Utc>,
    pub fields: Vec<EmbedField>,
}

impl EmbedPayload {
    /// Render into a serenity embed
    pub fn to_create_embed(&self) -> serenity::CreateEmbed {
        serenity::CreateEmbed::new()
            .title(self.title.clone())
            .colour(self.color)
            .timestamp(serenity::Timestamp::from(self.timestamp))
            .fields(
                self.fields
                    .iter()
                    .map(|f| (f.heading.clone(), f.body.clone(), false)),
            )
    }
}

/// League table, top rows only
pub fn standings_embed(entries: &[StandingEntry]) -> EmbedPayload {
    let fields = entries
        .iter()
        .take(STANDINGS_LIMIT)
        .map(|e| EmbedField {
            heading: format!("{}. {}", e.rank, e.entry_name),
            body: format!("{} pts", e.total),
        })
        .collect();

    EmbedPayload {
        title: "🏆 League Standings".to_string(),
        color: STANDINGS_COLOR,
        timestamp: Utc::now(),
        fields,
    }
}

/// Captain picks, one field per manager
pub fn captains_embed(summary: &CaptainSummary) -> EmbedPayload {
    let fields = summary
        .rows
        .iter()
        .map(|row| EmbedField {
            heading: row.manager.clone(),
            body: format!("C: {} | VC: {}", row.captain, row.vice_captain),
        })
        .collect();

    EmbedPayload {
        title: format!("Captain Picks for GW{}", summary.gameweek),
        color: CAPTAINS_COLOR,
        timestamp: Utc::now(),
        fields,
    }
}

/// Transfer counts, one field per manager with any transfers
pub fn transfers_embed(summary: &TransferSummary) -> EmbedPayload {
    let fields = summary
        .rows
        .iter()
        .map(|row| EmbedField {
            heading: row.manager.clone(),
            body: if row.transfers == 1 {
                "1 transfer".to_string()
            } else {
                format!("{} transfers", row.transfers)
            },
        })
        .collect();

    EmbedPayload {
        title: "Transfer Activity".to_string(),
        color: TRANSFERS_COLOR,
        timestamp: Utc::now(),
        fields,
    }
}

/// Reply line for the legacy price command
pub fn price_line(player: &PlayerInfo) -> String {
    format!("{} is priced at £{}m", player.name, player.price_display())
}
