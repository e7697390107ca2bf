//! Gaffer - FPL stats relay bot for Discord
//!
//! Wires the FPL client, settings store, scheduled jobs, command surface,
//! and the liveness endpoint, then runs the gateway until Ctrl+C.

use clap::Parser;
use gaffer_bot::{BotHealth, JsonSettingsStore, SettingsStore};
use gaffer_core::Config;
use gaffer_fpl::{FplClient, FplClientConfig, PlayerIndex};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "gaffer")]
#[command(about = "FPL stats relay bot for Discord")]
struct Args {
    /// Settings file path (overrides GAFFER_SETTINGS_PATH)
    #[arg(long)]
    settings_path: Option<String>,

    /// Health server bind address (overrides PORT)
    #[arg(long)]
    health_bind: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gaffer...");

    // 1. Configuration
    let mut config = Config::from_env()?;
    if let Some(path) = args.settings_path {
        config.settings_path = path.into();
    }
    config.validate()?;
    let config = Arc::new(config);

    // 2. Settings store
    let store: Arc<dyn SettingsStore> =
        Arc::new(JsonSettingsStore::open(&config.settings_path).await?);

    // 3. FPL client
    let fpl = Arc::new(FplClient::new(FplClientConfig {
        base_url: config.fpl_base_url.clone(),
        timeout: Duration::from_secs(config.http_timeout_secs),
    }));

    // 4. Player index (loaded once, backs price lookups)
    let players = match fpl.bootstrap().await {
        Ok(bootstrap) => {
            let index = PlayerIndex::from_bootstrap(&bootstrap);
            info!(players = index.len(), "Loaded player index");
            Arc::new(index)
        }
        Err(e) => {
            warn!(error = %e, "Could not load player index, price lookups will miss");
            Arc::new(PlayerIndex::default())
        }
    };

    // 5. Health server
    let health = Arc::new(BotHealth::new());
    let health_bind: SocketAddr = match &args.health_bind {
        Some(bind) => bind.parse()?,
        None => SocketAddr::from(([0, 0, 0, 0], config.health_port)),
    };
    let health_state = health.clone();
    tokio::spawn(async move {
        if let Err(e) = gaffer_bot::health::serve(health_bind, health_state).await {
            warn!(error = %e, "Health server stopped");
        }
    });

    // 6. Discord client
    let mut client = gaffer_bot::create_bot(config, fpl, store, players, health)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    info!("Gaffer running. Press Ctrl+C to stop.");

    tokio::select! {
        result = client.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down...");
        }
    }

    info!("Gaffer stopped.");
    Ok(())
}
