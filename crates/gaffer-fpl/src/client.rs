//! Typed client for the FPL public API
//!
//! One shared `reqwest::Client` with a fixed timeout. No retries, no
//! rate-limit handling, no caching. Transport failures and non-2xx statuses
//! map to `GafferError::Upstream`; bodies that fail typed decode map to
//! `GafferError::Schema` so schema drift is distinguishable in logs.

use crate::models::{Bootstrap, EntryPicks, LeagueStandings, TransferRecord};
use gaffer_core::{GafferError, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default FPL API base URL
pub const FPL_API_URL: &str = "https://fantasy.premierleague.com/api";

/// FPL client configuration
#[derive(Debug, Clone)]
pub struct FplClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FplClientConfig {
    fn default() -> Self {
        Self {
            base_url: FPL_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// FPL API client
pub struct FplClient {
    client: reqwest::Client,
    config: FplClientConfig,
}

impl FplClient {
    /// Create a new FPL client
    pub fn new(config: FplClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(FplClientConfig::default())
    }

    /// GET `path` relative to the base URL and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, "Fetching FPL API");

        let response =
            self.client
                .get(&url)
                .send()
                .await
                .map_err(|e| GafferError::Upstream {
                    endpoint: path.to_string(),
                    message: e.to_string(),
                    status: None,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GafferError::Upstream {
                endpoint: path.to_string(),
                message: format!("FPL API returned {}", status),
                status: Some(status.as_u16()),
            });
        }

        // Read the body first so decode failures surface as schema errors
        // with the endpoint attached, not as transport errors.
        let body = response.text().await.map_err(|e| GafferError::Upstream {
            endpoint: path.to_string(),
            message: e.to_string(),
            status: Some(status.as_u16()),
        })?;

        serde_json::from_str(&body).map_err(|e| GafferError::Schema {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    /// `/bootstrap-static/`: all players and gameweek events
    pub async fn bootstrap(&self) -> Result<Bootstrap> {
        self.get_json("/bootstrap-static/").await
    }

    /// `/leagues-classic/{id}/standings/`: first page of a classic league table
    pub async fn league_standings(&self, league_id: u64) -> Result<LeagueStandings> {
        self.get_json(&format!("/leagues-classic/{}/standings/", league_id))
            .await
    }

    /// `/entry/{id}/event/{gw}/picks/`: a manager's squad for one gameweek
    ///
    /// A 404 means the manager has no picks for that gameweek and is
    /// reported as `Ok(None)` rather than an error.
    pub async fn entry_picks(&self, entry_id: u64, gameweek: u32) -> Result<Option<EntryPicks>> {
        let path = format!("/entry/{}/event/{}/picks/", entry_id, gameweek);
        match self.get_json(&path).await {
            Ok(picks) => Ok(Some(picks)),
            Err(GafferError::Upstream {
                status: Some(404), ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// `/entry/{id}/transfers/`: every transfer a manager has made
    pub async fn entry_transfers(&self, entry_id: u64) -> Result<Vec<TransferRecord>> {
        self.get_json(&format!("/entry/{}/transfers/", entry_id))
            .await
    }
}
