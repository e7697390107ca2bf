//! Weekly job scheduling and the scheduled post loops
//!
//! Each job parses a "ddd HH:MM" trigger (UTC), sleeps until the next
//! occurrence, runs, and re-arms for the following week. A firing iterates
//! every configured server; the first failing server aborts the rest of
//! that firing after a warn, and the loop re-arms regardless.

use crate::health::BotHealth;
use crate::presenter::{self, EmbedPayload};
use crate::store::SettingsStore;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveTime, Utc, Weekday};
use gaffer_core::{Config, GafferError, Result};
use gaffer_fpl::{self as fpl, FplClient, SummaryOptions};
use poise::serenity_prelude as serenity;
use std::str::FromStr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A weekly trigger like "sun 23:00" (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub time: NaiveTime,
}

impl FromStr for WeeklySchedule {
    type Err = GafferError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(day), Some(time), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(GafferError::InvalidConfig(format!(
                "schedule '{}' is not of the form 'ddd HH:MM'",
                s
            )));
        };

        let weekday = day.parse::<Weekday>().map_err(|_| {
            GafferError::InvalidConfig(format!("schedule '{}' has an unknown weekday", s))
        })?;
        let time = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
            GafferError::InvalidConfig(format!("schedule '{}' has an invalid time", s))
        })?;

        Ok(Self { weekday, time })
    }
}

impl WeeklySchedule {
    /// Next occurrence strictly after `now`
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days_ahead = (self.weekday.num_days_from_monday() + 7
            - now.weekday().num_days_from_monday())
            % 7;
        let candidate = (now.date_naive() + ChronoDuration::days(days_ahead as i64))
            .and_time(self.time)
            .and_utc();

        if candidate <= now {
            candidate + ChronoDuration::days(7)
        } else {
            candidate
        }
    }
}

/// Everything a scheduled job needs to post
pub struct JobCtx {
    pub http: Arc<serenity::Http>,
    pub fpl: Arc<FplClient>,
    pub store: Arc<dyn SettingsStore>,
    pub opts: SummaryOptions,
    pub health: Arc<BotHealth>,
}

/// Which summary a job loop posts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Standings,
    Captains,
    Transfers,
}

impl JobKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Standings => "standings",
            Self::Captains => "captains",
            Self::Transfers => "transfers",
        }
    }
}

/// Post current standings to every configured server
pub async fn run_standings_job(ctx: &JobCtx) -> Result<u32> {
    let mut posted = 0;
    for (server_id, config) in ctx.store.all().await {
        let standings = ctx.fpl.league_standings(config.league_id).await?;
        let payload = presenter::standings_embed(&standings.standings.results);
        post_embed(ctx, &server_id, config.channel_id, payload).await?;
        posted += 1;
    }
    Ok(posted)
}

/// Post captain picks for the current gameweek to every configured server
pub async fn run_captains_job(ctx: &JobCtx) -> Result<u32> {
    let servers = ctx.store.all().await;
    if servers.is_empty() {
        return Ok(0);
    }

    let gameweek = fpl::current_gameweek(&ctx.fpl).await?;
    let mut posted = 0;
    for (server_id, config) in servers {
        let summary = fpl::captain_summary(&ctx.fpl, config.league_id, gameweek, ctx.opts).await?;
        let payload = presenter::captains_embed(&summary);
        post_embed(ctx, &server_id, config.channel_id, payload).await?;
        posted += 1;
    }
    Ok(posted)
}

/// Post transfer counts to every configured server
pub async fn run_transfers_job(ctx: &JobCtx) -> Result<u32> {
    let mut posted = 0;
    for (server_id, config) in ctx.store.all().await {
        let summary = fpl::transfer_summary(&ctx.fpl, config.league_id, ctx.opts).await?;
        let payload = presenter::transfers_embed(&summary);
        post_embed(ctx, &server_id, config.channel_id, payload).await?;
        posted += 1;
    }
    Ok(posted)
}

async fn post_embed(
    ctx: &JobCtx,
    server_id: &str,
    channel_id: u64,
    payload: EmbedPayload,
) -> Result<()> {
    let message = serenity::CreateMessage::new().embed(payload.to_create_embed());
    serenity::ChannelId::new(channel_id)
        .send_message(&ctx.http, message)
        .await
        .map_err(|e| {
            GafferError::Discord(format!("send to channel {} failed: {}", channel_id, e))
        })?;

    ctx.health.embeds_posted.fetch_add(1, Ordering::Relaxed);
    debug!(server_id, channel_id, "Posted scheduled embed");
    Ok(())
}

async fn run_job(ctx: &JobCtx, kind: JobKind) -> Result<u32> {
    match kind {
        JobKind::Standings => run_standings_job(ctx).await,
        JobKind::Captains => run_captains_job(ctx).await,
        JobKind::Transfers => run_transfers_job(ctx).await,
    }
}

/// Spawn one weekly loop per job
pub fn spawn_jobs(ctx: JobCtx, config: &Config) -> Result<()> {
    let jobs = [
        (
            JobKind::Standings,
            config.standings_at.parse::<WeeklySchedule>()?,
        ),
        (JobKind::Captains, config.captains_at.parse()?),
        (JobKind::Transfers, config.transfers_at.parse()?),
    ];

    let ctx = Arc::new(ctx);
    for (kind, schedule) in jobs {
        let ctx = ctx.clone();
        tokio::spawn(async move {
            job_loop(ctx, kind, schedule).await;
        });
    }

    Ok(())
}

async fn job_loop(ctx: Arc<JobCtx>, kind: JobKind, schedule: WeeklySchedule) {
    info!(job = kind.name(), ?schedule, "Scheduled job armed");

    loop {
        let now = Utc::now();
        let next = schedule.next_occurrence(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(
            job = kind.name(),
            next = %next,
            wait_secs = wait.as_secs(),
            "Sleeping until next firing"
        );
        tokio::time::sleep(wait).await;

        ctx.health.jobs_run.fetch_add(1, Ordering::Relaxed);
        match run_job(&ctx, kind).await {
            Ok(posted) => info!(job = kind.name(), posted, "Scheduled job finished"),
            Err(e) => {
                if e.is_upstream() {
                    ctx.health.upstream_errors.fetch_add(1, Ordering::Relaxed);
                }
                warn!(
                    job = kind.name(),
                    error_kind = e.kind(),
                    error = %e,
                    "Scheduled job aborted, re-arming for next week"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonSettingsStore;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_schedule_parsing() {
        let schedule: WeeklySchedule = "sun 23:00".parse().unwrap();
        assert_eq!(schedule.weekday, Weekday::Sun);
        assert_eq!(schedule.time, NaiveTime::from_hms_opt(23, 0, 0).unwrap());

        let schedule: WeeklySchedule = "fri 17:00".parse().unwrap();
        assert_eq!(schedule.weekday, Weekday::Fri);

        assert!("sun".parse::<WeeklySchedule>().is_err());
        assert!("noday 10:00".parse::<WeeklySchedule>().is_err());
        assert!("sun 25:00".parse::<WeeklySchedule>().is_err());
        assert!("sun 23:00 extra".parse::<WeeklySchedule>().is_err());
    }

    #[test]
    fn test_next_occurrence() {
        // Wednesday noon
        let now = Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap();

        let sunday: WeeklySchedule = "sun 23:00".parse().unwrap();
        assert_eq!(
            sunday.next_occurrence(now),
            Utc.with_ymd_and_hms(2025, 8, 24, 23, 0, 0).unwrap()
        );

        // Later the same day
        let later_today: WeeklySchedule = "wed 20:00".parse().unwrap();
        assert_eq!(
            later_today.next_occurrence(now),
            Utc.with_ymd_and_hms(2025, 8, 20, 20, 0, 0).unwrap()
        );

        // Earlier the same day rolls a full week
        let earlier_today: WeeklySchedule = "wed 08:00".parse().unwrap();
        assert_eq!(
            earlier_today.next_occurrence(now),
            Utc.with_ymd_and_hms(2025, 8, 27, 8, 0, 0).unwrap()
        );
    }

    async fn empty_ctx(dir: &tempfile::TempDir) -> JobCtx {
        let store = JsonSettingsStore::open(dir.path().join("servers.json"))
            .await
            .unwrap();
        JobCtx {
            http: Arc::new(serenity::Http::new("")),
            fpl: Arc::new(FplClient::with_defaults()),
            store: Arc::new(store),
            opts: SummaryOptions::default(),
            health: Arc::new(BotHealth::new()),
        }
    }

    #[tokio::test]
    async fn test_jobs_with_empty_store_post_nothing() {
        let dir = tempdir().unwrap();
        let ctx = empty_ctx(&dir).await;

        assert_eq!(run_standings_job(&ctx).await.unwrap(), 0);
        assert_eq!(run_captains_job(&ctx).await.unwrap(), 0);
        assert_eq!(run_transfers_job(&ctx).await.unwrap(), 0);
        assert_eq!(ctx.health.embeds_posted.load(Ordering::Relaxed), 0);
    }
}
