//! Configuration management for the gaffer bot
//!
//! Configuration is loaded from environment variables, with `.env` files
//! honored for local development.

use crate::error::{GafferError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration struct
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // ───────────────────────────────────────────────────────────
    // Credentials (from environment)
    // ───────────────────────────────────────────────────────────
    /// Discord bot token (required)
    #[serde(default)]
    pub discord_token: String,

    // ───────────────────────────────────────────────────────────
    // Upstream API settings
    // ───────────────────────────────────────────────────────────
    /// Base URL of the FPL public API
    #[serde(default = "default_fpl_base_url")]
    pub fpl_base_url: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Max in-flight per-manager fetches (1 = sequential)
    #[serde(default = "default_fanout")]
    pub fanout: usize,

    // ───────────────────────────────────────────────────────────
    // Settings store
    // ───────────────────────────────────────────────────────────
    /// Path to the per-server settings JSON file
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    // ───────────────────────────────────────────────────────────
    // Schedule (weekly, "ddd HH:MM", UTC)
    // ───────────────────────────────────────────────────────────
    /// When the standings job fires
    #[serde(default = "default_standings_at")]
    pub standings_at: String,

    /// When the captains job fires
    #[serde(default = "default_captains_at")]
    pub captains_at: String,

    /// When the transfers job fires
    #[serde(default = "default_transfers_at")]
    pub transfers_at: String,

    // ───────────────────────────────────────────────────────────
    // Bot surface
    // ───────────────────────────────────────────────────────────
    /// Prefix for legacy text commands
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// Port for the liveness HTTP endpoint
    #[serde(default = "default_health_port")]
    pub health_port: u16,
}

// ─────────────────────────────────────────────────────────────────────────────
// Default value functions
// ─────────────────────────────────────────────────────────────────────────────

fn default_fpl_base_url() -> String {
    "https://fantasy.premierleague.com/api".to_string()
}
fn default_http_timeout() -> u64 {
    30
}
fn default_fanout() -> usize {
    1
}
fn default_settings_path() -> PathBuf {
    PathBuf::from("./data/servers.json")
}
fn default_standings_at() -> String {
    "sun 23:00".to_string()
}
fn default_captains_at() -> String {
    "fri 17:00".to_string()
}
fn default_transfers_at() -> String {
    "wed 20:00".to_string()
}
fn default_command_prefix() -> String {
    "!".to_string()
}
fn default_health_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: String::new(),
            fpl_base_url: default_fpl_base_url(),
            http_timeout_secs: default_http_timeout(),
            fanout: default_fanout(),
            settings_path: default_settings_path(),
            standings_at: default_standings_at(),
            captains_at: default_captains_at(),
            transfers_at: default_transfers_at(),
            command_prefix: default_command_prefix(),
            health_port: default_health_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        config.discord_token = std::env::var("DISCORD_TOKEN").unwrap_or_default();

        if let Ok(v) = std::env::var("FPL_BASE_URL") {
            config.fpl_base_url = v;
        }

        if let Ok(v) = std::env::var("GAFFER_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = v.parse().unwrap_or(default_http_timeout());
        }

        if let Ok(v) = std::env::var("GAFFER_FANOUT") {
            config.fanout = v.parse().unwrap_or(default_fanout());
        }

        if let Ok(v) = std::env::var("GAFFER_SETTINGS_PATH") {
            config.settings_path = PathBuf::from(v);
        }

        if let Ok(v) = std::env::var("GAFFER_STANDINGS_AT") {
            config.standings_at = v;
        }

        if let Ok(v) = std::env::var("GAFFER_CAPTAINS_AT") {
            config.captains_at = v;
        }

        if let Ok(v) = std::env::var("GAFFER_TRANSFERS_AT") {
            config.transfers_at = v;
        }

        if let Ok(v) = std::env::var("GAFFER_COMMAND_PREFIX") {
            config.command_prefix = v;
        }

        if let Ok(v) = std::env::var("PORT") {
            config.health_port = v.parse().unwrap_or(default_health_port());
        }

        Ok(config)
    }

    /// Validate configuration before startup
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.is_empty() {
            return Err(GafferError::MissingConfig("DISCORD_TOKEN".to_string()));
        }
        if self.fanout == 0 {
            return Err(GafferError::InvalidConfig(
                "GAFFER_FANOUT must be at least 1".to_string(),
            ));
        }
        if self.command_prefix.is_empty() {
            return Err(GafferError::InvalidConfig(
                "GAFFER_COMMAND_PREFIX must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
