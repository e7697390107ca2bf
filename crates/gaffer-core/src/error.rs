//! Error types for the gaffer bot

use thiserror::Error;

/// Main error type for gaffer operations
#[derive(Error, Debug)]
pub enum GafferError {
    // ─────────────────────────────────────────────────────────────
    // Upstream API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("FPL API error: {message} on {endpoint} (status: {status:?})")]
    Upstream {
        endpoint: String,
        message: String,
        status: Option<u16>,
    },

    #[error("FPL response schema mismatch on {endpoint}: {message}")]
    Schema { endpoint: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Discord Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Discord delivery failed: {0}")]
    Discord(String),

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ─────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Result type alias for gaffer operations
pub type Result<T> = std::result::Result<T, GafferError>;

impl GafferError {
    /// Short kind label for structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Upstream { .. } => "upstream",
            Self::Schema { .. } => "schema",
            Self::Discord(_) => "discord",
            Self::MissingConfig(_) | Self::InvalidConfig(_) => "config",
            Self::Io(_) | Self::JsonParse(_) => "io",
        }
    }

    /// Check if this error came from the upstream API (transport or schema)
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream { .. } | Self::Schema { .. })
    }
}
