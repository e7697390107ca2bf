//! Slash and legacy prefix commands
//!
//! Guild commands read the requesting server's settings first and prompt
//! for `/setup` when absent. Upstream failures answer a short generic line;
//! the cause lands in the logs.

use crate::health::BotHealth;
use crate::presenter::{self, EmbedPayload};
use crate::store::SettingsStore;
use gaffer_core::{Config, GafferError, ServerConfig};
use gaffer_fpl::{self as fpl, FplClient, PlayerIndex, SummaryOptions};
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state behind every command
pub struct Data {
    pub config: Arc<Config>,
    pub fpl: Arc<FplClient>,
    pub store: Arc<dyn SettingsStore>,
    pub players: Arc<PlayerIndex>,
    pub health: Arc<BotHealth>,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

const NOT_SET_UP: &str =
    "This server is not set up yet. Run `/setup` with your league id and a channel first.";

const UPSTREAM_FAILED: &str = "Could not reach the FPL API, try again later.";

/// All commands, in registration order
pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        setup(),
        view(),
        standings(),
        captains(),
        transfers(),
        ping(),
        price(),
    ]
}

/// Settings for the requesting guild, or `None` after prompting the user
async fn server_config(ctx: &Context<'_>) -> Result<Option<ServerConfig>, Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command only works in a server.").await?;
        return Ok(None);
    };

    match ctx.data().store.get(&guild_id.to_string()).await {
        Some(config) => Ok(Some(config)),
        None => {
            ctx.say(NOT_SET_UP).await?;
            Ok(None)
        }
    }
}

async fn send_embed(ctx: &Context<'_>, payload: EmbedPayload) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(payload.to_create_embed()))
        .await?;
    ctx.data()
        .health
        .embeds_posted
        .fetch_add(1, Ordering::Relaxed);
    Ok(())
}

async fn reply_upstream_failure(
    ctx: &Context<'_>,
    command: &str,
    e: GafferError,
) -> Result<(), Error> {
    ctx.data()
        .health
        .upstream_errors
        .fetch_add(1, Ordering::Relaxed);
    warn!(command, error_kind = e.kind(), error = %e, "Command hit an upstream failure");
    ctx.say(UPSTREAM_FAILED).await?;
    Ok(())
}

/// Point the bot at a league and a channel for this server
#[poise::command(slash_command, guild_only)]
pub async fn setup(
    ctx: Context<'_>,
    #[description = "FPL classic league id"] league_id: u64,
    #[description = "Channel scheduled posts go to"] channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say("This command only works in a server.").await?;
        return Ok(());
    };

    let config = ServerConfig {
        league_id,
        channel_id: channel.id.get(),
    };
    ctx.data().store.set(&guild_id.to_string(), config).await?;
    info!(
        guild_id = guild_id.get(),
        league_id,
        channel_id = config.channel_id,
        "Server set up"
    );

    ctx.say(format!(
        "Setup saved: league {} will post to {}.",
        league_id,
        channel.id.mention()
    ))
    .await?;
    Ok(())
}

/// Show this server's league and channel
#[poise::command(slash_command, guild_only)]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    let Some(config) = server_config(&ctx).await? else {
        return Ok(());
    };

    ctx.say(format!(
        "League {} posting to {}.",
        config.league_id,
        serenity::ChannelId::new(config.channel_id).mention()
    ))
    .await?;
    Ok(())
}

/// Current league standings (top 10)
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn standings(ctx: Context<'_>) -> Result<(), Error> {
    let Some(config) = server_config(&ctx).await? else {
        return Ok(());
    };
    ctx.defer().await?;

    match ctx.data().fpl.league_standings(config.league_id).await {
        Ok(standings) => {
            send_embed(&ctx, presenter::standings_embed(&standings.standings.results)).await?
        }
        Err(e) => reply_upstream_failure(&ctx, "standings", e).await?,
    }
    Ok(())
}

/// Captain picks across the league for the current gameweek
#[poise::command(slash_command, guild_only)]
pub async fn captains(ctx: Context<'_>) -> Result<(), Error> {
    let Some(config) = server_config(&ctx).await? else {
        return Ok(());
    };
    ctx.defer().await?;

    let data = ctx.data();
    let opts = SummaryOptions {
        fanout: data.config.fanout,
    };

    let result = async {
        let gameweek = fpl::current_gameweek(&data.fpl).await?;
        fpl::captain_summary(&data.fpl, config.league_id, gameweek, opts).await
    }
    .await;

    match result {
        Ok(summary) => send_embed(&ctx, presenter::captains_embed(&summary)).await?,
        Err(e) => reply_upstream_failure(&ctx, "captains", e).await?,
    }
    Ok(())
}

/// Transfer counts across the league
#[poise::command(slash_command, guild_only)]
pub async fn transfers(ctx: Context<'_>) -> Result<(), Error> {
    let Some(config) = server_config(&ctx).await? else {
        return Ok(());
    };
    ctx.defer().await?;

    let data = ctx.data();
    let opts = SummaryOptions {
        fanout: data.config.fanout,
    };

    match fpl::transfer_summary(&data.fpl, config.league_id, opts).await {
        Ok(summary) => send_embed(&ctx, presenter::transfers_embed(&summary)).await?,
        Err(e) => reply_upstream_failure(&ctx, "transfers", e).await?,
    }
    Ok(())
}

/// Liveness check
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("pong").await?;
    Ok(())
}

/// Price lookup against the startup player snapshot
#[poise::command(prefix_command)]
pub async fn price(
    ctx: Context<'_>,
    #[rest]
    #[description = "Player name or part of it"]
    name: String,
) -> Result<(), Error> {
    let reply = match ctx.data().players.find_by_name(&name) {
        Some(player) => presenter::price_line(player),
        None => presenter::PRICE_NOT_FOUND.to_string(),
    };
    ctx.say(reply).await?;
    Ok(())
}
