//! Ad-hoc probe against the live FPL API
//!
//! Fetches one league and prints the standings, captain, and transfer
//! summaries as plain text, without needing a Discord token.

use clap::Parser;
use gaffer_fpl::{FplClient, FplClientConfig, SummaryOptions};

#[derive(Parser, Debug)]
#[command(name = "fpl-probe")]
#[command(about = "Print FPL league summaries to stdout")]
struct Args {
    /// FPL classic league id
    #[arg(long)]
    league: u64,

    /// Gameweek override (defaults to the current one)
    #[arg(long)]
    gameweek: Option<u32>,

    /// Max in-flight per-manager fetches
    #[arg(long, default_value = "1")]
    fanout: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let client = FplClient::new(FplClientConfig::default());
    let opts = SummaryOptions {
        fanout: args.fanout,
    };

    let gameweek = match args.gameweek {
        Some(gw) => gw,
        None => gaffer_fpl::current_gameweek(&client).await?,
    };
    println!("Gameweek: {}", gameweek);

    let standings = client.league_standings(args.league).await?;
    println!("\n=== {} ===", standings.league.name);
    for entry in &standings.standings.results {
        println!(
            "{:>3}. {} ({}) - {} pts",
            entry.rank, entry.entry_name, entry.player_name, entry.total
        );
    }

    let captains = gaffer_fpl::captain_summary(&client, args.league, gameweek, opts).await?;
    println!("\n=== Captains GW{} ===", captains.gameweek);
    for row in &captains.rows {
        println!("{}: C {} / VC {}", row.manager, row.captain, row.vice_captain);
    }

    let transfers = gaffer_fpl::transfer_summary(&client, args.league, opts).await?;
    println!("\n=== Transfers ===");
    if transfers.rows.is_empty() {
        println!("(none)");
    } else {
        for row in &transfers.rows {
            println!("{}: {}", row.manager, row.transfers);
        }
    }

    Ok(())
}
