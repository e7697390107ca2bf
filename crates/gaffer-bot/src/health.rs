//! Liveness endpoint and shared bot counters
//!
//! `GET /` is the fixed-text probe the hosting platform polls; `GET /health`
//! returns a counter snapshot for debugging.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Counters shared between commands, scheduled jobs, and the endpoint
pub struct BotHealth {
    started_at_unix: AtomicU64,
    pub jobs_run: AtomicU64,
    pub embeds_posted: AtomicU64,
    pub upstream_errors: AtomicU64,
}

impl BotHealth {
    pub fn new() -> Self {
        Self {
            started_at_unix: AtomicU64::new(now_unix()),
            jobs_run: AtomicU64::new(0),
            embeds_posted: AtomicU64::new(0),
            upstream_errors: AtomicU64::new(0),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        now_unix().saturating_sub(self.started_at_unix.load(Ordering::Relaxed))
    }
}

impl Default for BotHealth {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    jobs_run: u64,
    embeds_posted: u64,
    upstream_errors: u64,
}

/// `GET /`: the hosting platform's liveness probe
async fn root_handler() -> &'static str {
    "ok"
}

/// `GET /health`: counter snapshot
async fn health_handler(health: axum::extract::State<Arc<BotHealth>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: health.uptime_secs(),
        jobs_run: health.jobs_run.load(Ordering::Relaxed),
        embeds_posted: health.embeds_posted.load(Ordering::Relaxed),
        upstream_errors: health.upstream_errors.load(Ordering::Relaxed),
    })
}

/// Build the liveness router
pub fn router(health: Arc<BotHealth>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(health)
}

/// Serve the liveness endpoint until the process exits
pub async fn serve(bind: SocketAddr, health: Arc<BotHealth>) -> std::io::Result<()> {
    info!(%bind, "Health server starting");
    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, router(health)).await
}
