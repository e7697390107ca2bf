//! Aggregators combining multiple FPL endpoint fetches
//!
//! `captain_summary` and `transfer_summary` fan out across a league's
//! managers. Fan-out is sequential by default; widths above 1 use a bounded,
//! order-preserving pipeline. One failing fetch aborts the whole summary; a
//! picks 404 is absence and skips only that manager.

use crate::client::FplClient;
use crate::models::{EntryPicks, StandingEntry, TransferRecord};
use crate::players::PlayerIndex;
use futures::stream::{self, StreamExt, TryStreamExt};
use gaffer_core::Result;
use tracing::debug;

/// Fan-out options for the per-manager fetch loops
#[derive(Debug, Clone, Copy)]
pub struct SummaryOptions {
    /// Max in-flight per-manager fetches (1 = sequential)
    pub fanout: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self { fanout: 1 }
    }
}

/// One manager's captain picks for a gameweek
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptainRow {
    pub manager: String,
    pub captain: String,
    pub vice_captain: String,
}

/// Captain picks across a league for one gameweek
#[derive(Debug, Clone)]
pub struct CaptainSummary {
    pub gameweek: u32,
    pub rows: Vec<CaptainRow>,
}

/// One manager's transfer count (managers with zero transfers are omitted)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRow {
    pub manager: String,
    pub transfers: usize,
}

/// Transfer counts across a league
#[derive(Debug, Clone)]
pub struct TransferSummary {
    pub rows: Vec<TransferRow>,
}

/// The gameweek the bootstrap flags as current, or 1
pub async fn current_gameweek(client: &FplClient) -> Result<u32> {
    Ok(client.bootstrap().await?.current_gameweek())
}

/// Captain and vice-captain picks for every manager in a league
///
/// Managers with no picks for the gameweek, with no captain or vice-captain
/// flag, or whose flagged player id is missing from the snapshot are skipped
/// without error.
pub async fn captain_summary(
    client: &FplClient,
    league_id: u64,
    gameweek: u32,
    opts: SummaryOptions,
) -> Result<CaptainSummary> {
    let bootstrap = client.bootstrap().await?;
    let index = PlayerIndex::from_bootstrap(&bootstrap);

    let standings = client.league_standings(league_id).await?;
    let entries = standings.standings.results;
    debug!(
        league_id,
        gameweek,
        managers = entries.len(),
        "Building captain summary"
    );

    let picks: Vec<Option<EntryPicks>> = if opts.fanout <= 1 {
        let mut out = Vec::with_capacity(entries.len());
        for entry in &entries {
            out.push(client.entry_picks(entry.entry, gameweek).await?);
        }
        out
    } else {
        // The stream closure must take owned ids; one borrowing
        // `&StandingEntry` cannot be proven `Send` where the commands
        // and job loops spawn these futures.
        let ids: Vec<u64> = entries.iter().map(|e| e.entry).collect();
        stream::iter(ids)
            .map(|id| client.entry_picks(id, gameweek))
            .buffered(opts.fanout)
            .try_collect()
            .await?
    };

    let rows = entries
        .iter()
        .zip(picks.iter())
        .filter_map(|(entry, picks)| captain_row(entry, picks.as_ref(), &index))
        .collect();

    Ok(CaptainSummary { gameweek, rows })
}

/// Transfer counts for every manager in a league
pub async fn transfer_summary(
    client: &FplClient,
    league_id: u64,
    opts: SummaryOptions,
) -> Result<TransferSummary> {
    let standings = client.league_standings(league_id).await?;
    let entries = standings.standings.results;
    debug!(
        league_id,
        managers = entries.len(),
        "Building transfer summary"
    );

    let transfers: Vec<Vec<TransferRecord>> = if opts.fanout <= 1 {
        let mut out = Vec::with_capacity(entries.len());
        for entry in &entries {
            out.push(client.entry_transfers(entry.entry).await?);
        }
        out
    } else {
        let ids: Vec<u64> = entries.iter().map(|e| e.entry).collect();
        stream::iter(ids)
            .map(|id| client.entry_transfers(id))
            .buffered(opts.fanout)
            .try_collect()
            .await?
    };

    Ok(TransferSummary {
        rows: transfer_rows(&entries, &transfers),
    })
}

/// Build one captain row, or `None` when the manager must be skipped
fn captain_row(
    entry: &StandingEntry,
    picks: Option<&EntryPicks>,
    index: &PlayerIndex,
) -> Option<CaptainRow> {
    let picks = picks?;
    let captain_id = picks.picks.iter().find(|p| p.is_captain)?.element;
    let vice_id = picks.picks.iter().find(|p| p.is_vice_captain)?.element;

    Some(CaptainRow {
        manager: entry.entry_name.clone(),
        captain: index.name_of(captain_id)?.to_string(),
        vice_captain: index.name_of(vice_id)?.to_string(),
    })
}

/// Pair managers with their transfer counts, dropping zero-transfer managers
fn transfer_rows(entries: &[StandingEntry], transfers: &[Vec<TransferRecord>]) -> Vec<TransferRow> {
    entries
        .iter()
        .zip(transfers.iter())
        .filter(|(_, t)| !t.is_empty())
        .map(|(entry, t)| TransferRow {
            manager: entry.entry_name.clone(),
            transfers: t.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FplClientConfig;
    use crate::models::{Bootstrap, Pick};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::time::Duration;

    fn entry(name: &str) -> StandingEntry {
        StandingEntry {
            entry: 101,
            entry_name: name.to_string(),
            player_name: "Someone".to_string(),
            rank: 1,
            total: 500,
        }
    }

    fn pick(element: u32, is_captain: bool, is_vice_captain: bool) -> Pick {
        Pick {
            element,
            is_captain,
            is_vice_captain,
        }
    }

    fn index() -> PlayerIndex {
        let bootstrap: Bootstrap = serde_json::from_str(
            r#"{
                "events": [],
                "elements": [
                    {"id": 1, "web_name": "Salah", "now_cost": 130, "status": "a"},
                    {"id": 2, "web_name": "Haaland", "now_cost": 151, "status": "a"}
                ]
            }"#,
        )
        .unwrap();
        PlayerIndex::from_bootstrap(&bootstrap)
    }

    #[test]
    fn test_captain_row_happy_path() {
        let picks = EntryPicks {
            picks: vec![pick(1, true, false), pick(2, false, true)],
        };
        let row = captain_row(&entry("Kloppites"), Some(&picks), &index()).unwrap();
        assert_eq!(row.manager, "Kloppites");
        assert_eq!(row.captain, "Salah");
        assert_eq!(row.vice_captain, "Haaland");
    }

    #[test]
    fn test_captain_row_skips_manager_without_captain() {
        let picks = EntryPicks {
            picks: vec![pick(1, false, false), pick(2, false, true)],
        };
        assert!(captain_row(&entry("Kloppites"), Some(&picks), &index()).is_none());
    }

    #[test]
    fn test_captain_row_skips_manager_without_vice() {
        let picks = EntryPicks {
            picks: vec![pick(1, true, false), pick(2, false, false)],
        };
        assert!(captain_row(&entry("Kloppites"), Some(&picks), &index()).is_none());
    }

    #[test]
    fn test_captain_row_skips_manager_without_picks() {
        assert!(captain_row(&entry("Kloppites"), None, &index()).is_none());
    }

    #[test]
    fn test_captain_row_skips_unresolvable_player_id() {
        let picks = EntryPicks {
            picks: vec![pick(99, true, false), pick(2, false, true)],
        };
        assert!(captain_row(&entry("Kloppites"), Some(&picks), &index()).is_none());
    }

    #[test]
    fn test_transfer_rows_omit_zero_transfer_managers() {
        let entries = vec![entry("Kloppites"), entry("No Kane No Gain")];
        let record = TransferRecord {
            entry: 101,
            element_in: 5,
            element_out: 9,
            event: 3,
        };
        let transfers = vec![vec![record.clone(), record], vec![]];

        let rows = transfer_rows(&entries, &transfers);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].manager, "Kloppites");
        assert_eq!(rows[0].transfers, 2);
    }

    fn assert_send<T: Send>(_: &T) {}

    // Commands and job loops spawn these futures; the bound has to hold
    // with a fan-out width above one.
    #[test]
    fn test_summary_futures_are_send() {
        let client = FplClient::with_defaults();
        let opts = SummaryOptions { fanout: 4 };
        assert_send(&captain_summary(&client, 314, 1, opts));
        assert_send(&transfer_summary(&client, 314, opts));
    }

    // ─────────────────────────────────────────────────────────────
    // Fan-out against a loopback fixture API
    // ─────────────────────────────────────────────────────────────

    fn fixture_router() -> Router {
        async fn bootstrap() -> Json<serde_json::Value> {
            Json(json!({
                "events": [{"id": 4, "is_current": true}],
                "elements": [
                    {"id": 1, "web_name": "Salah", "now_cost": 130, "status": "a"},
                    {"id": 2, "web_name": "Haaland", "now_cost": 151, "status": "a"},
                    {"id": 3, "web_name": "Saka", "now_cost": 104, "status": "a"}
                ]
            }))
        }

        async fn standings(Path(league_id): Path<u64>) -> Json<serde_json::Value> {
            Json(json!({
                "league": {"id": league_id, "name": "Fixture League"},
                "standings": {"results": [
                    {"entry": 101, "entry_name": "Team A", "player_name": "Ana",
                     "rank": 1, "total": 612},
                    {"entry": 102, "entry_name": "Team B", "player_name": "Raj",
                     "rank": 2, "total": 598},
                    {"entry": 103, "entry_name": "Team C", "player_name": "Eli",
                     "rank": 3, "total": 570},
                    {"entry": 104, "entry_name": "Team D", "player_name": "Mia",
                     "rank": 4, "total": 544}
                ]}
            }))
        }

        // Entry 103 has no picks and answers 404.
        async fn picks(Path((entry, _gw)): Path<(u64, u32)>) -> Response {
            let body = match entry {
                101 => json!({"picks": [
                    {"element": 1, "is_captain": true},
                    {"element": 2, "is_vice_captain": true}
                ]}),
                102 => json!({"picks": [
                    {"element": 2, "is_captain": true},
                    {"element": 1, "is_vice_captain": true}
                ]}),
                104 => json!({"picks": [
                    {"element": 3, "is_captain": true},
                    {"element": 1, "is_vice_captain": true}
                ]}),
                _ => return StatusCode::NOT_FOUND.into_response(),
            };
            Json(body).into_response()
        }

        async fn transfers(Path(entry): Path<u64>) -> Json<serde_json::Value> {
            let rows = match entry {
                101 => json!([
                    {"entry": 101, "element_in": 2, "element_out": 3, "event": 4},
                    {"entry": 101, "element_in": 1, "element_out": 2, "event": 3}
                ]),
                103 => json!([
                    {"entry": 103, "element_in": 3, "element_out": 1, "event": 4}
                ]),
                _ => json!([]),
            };
            Json(rows)
        }

        Router::new()
            .route("/bootstrap-static/", get(bootstrap))
            .route("/leagues-classic/:league_id/standings/", get(standings))
            .route("/entry/:entry/event/:gw/picks/", get(picks))
            .route("/entry/:entry/transfers/", get(transfers))
    }

    async fn spawn_fixture_api() -> FplClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, fixture_router()).await.unwrap();
        });

        FplClient::new(FplClientConfig {
            base_url: format!("http://{}", addr),
            timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn test_captain_summary_buffered_fanout() {
        let client = spawn_fixture_api().await;

        let buffered = captain_summary(&client, 314, 4, SummaryOptions { fanout: 4 })
            .await
            .unwrap();

        // Standings order preserved; the 404 manager (Team C) is skipped.
        assert_eq!(buffered.gameweek, 4);
        assert_eq!(buffered.rows.len(), 3);
        assert_eq!(buffered.rows[0].manager, "Team A");
        assert_eq!(buffered.rows[0].captain, "Salah");
        assert_eq!(buffered.rows[1].manager, "Team B");
        assert_eq!(buffered.rows[1].captain, "Haaland");
        assert_eq!(buffered.rows[2].manager, "Team D");
        assert_eq!(buffered.rows[2].vice_captain, "Salah");

        let sequential = captain_summary(&client, 314, 4, SummaryOptions { fanout: 1 })
            .await
            .unwrap();
        assert_eq!(buffered.rows, sequential.rows);
    }

    #[tokio::test]
    async fn test_transfer_summary_buffered_fanout() {
        let client = spawn_fixture_api().await;

        let buffered = transfer_summary(&client, 314, SummaryOptions { fanout: 4 })
            .await
            .unwrap();

        assert_eq!(buffered.rows.len(), 2);
        assert_eq!(buffered.rows[0].manager, "Team A");
        assert_eq!(buffered.rows[0].transfers, 2);
        assert_eq!(buffered.rows[1].manager, "Team C");
        assert_eq!(buffered.rows[1].transfers, 1);

        let sequential = transfer_summary(&client, 314, SummaryOptions { fanout: 1 })
            .await
            .unwrap();
        assert_eq!(buffered.rows, sequential.rows);
    }
}
