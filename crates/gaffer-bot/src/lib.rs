//! Gaffer Bot - Discord surface for the FPL stats relay
//!
//! This crate holds everything between the FPL aggregators and Discord:
//! the settings store, the embed presenters, the command set, the weekly
//! scheduler, the liveness endpoint, and the client builder that wires
//! them together.

pub mod commands;
pub mod health;
pub mod presenter;
pub mod scheduler;
pub mod store;

pub use commands::{Context, Data, Error};
pub use health::BotHealth;
pub use scheduler::{JobCtx, JobKind, WeeklySchedule};
pub use store::{JsonSettingsStore, SettingsStore};

use gaffer_core::Config;
use gaffer_fpl::{FplClient, PlayerIndex, SummaryOptions};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info};

/// Build the Discord client: commands, prefix options, scheduled jobs
pub async fn create_bot(
    config: Arc<Config>,
    fpl: Arc<FplClient>,
    store: Arc<dyn SettingsStore>,
    players: Arc<PlayerIndex>,
    health: Arc<BotHealth>,
) -> Result<serenity::Client, Error> {
    let options = poise::FrameworkOptions {
        commands: commands::commands(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.command_prefix.clone()),
            ..Default::default()
        },
        ..Default::default()
    };

    let token = config.discord_token.clone();
    let framework = poise::Framework::builder()
        .options(options)
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, "Logged in");

                // Registration failure is logged but not fatal: prefix
                // commands keep working without the slash surface.
                match poise::builtins::register_globally(ctx, &framework.options().commands).await {
                    Ok(()) => info!(
                        count = framework.options().commands.len(),
                        "Registered slash commands"
                    ),
                    Err(e) => error!(error = %e, "Slash command registration failed"),
                }

                let job_ctx = scheduler::JobCtx {
                    http: ctx.http.clone(),
                    fpl: fpl.clone(),
                    store: store.clone(),
                    opts: SummaryOptions {
                        fanout: config.fanout,
                    },
                    health: health.clone(),
                };
                scheduler::spawn_jobs(job_ctx, &config)?;

                Ok(Data {
                    config,
                    fpl,
                    store,
                    players,
                    health,
                })
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await?;

    Ok(client)
}
