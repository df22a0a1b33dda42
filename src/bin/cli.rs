use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use matchday_oracle::cache::{create_cache, CacheTtls};
use matchday_oracle::config::Settings;
use matchday_oracle::data::{save_golden_bets_to_csv, save_json, save_value_bets_to_csv};
use matchday_oracle::oracle::{DailyOracle, OracleConfig};
use matchday_oracle::sync::LiveStateSynchronizer;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cli", about = "Matchday oracle operational commands")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the sports-data provider is reachable
    Health,
    /// Run the active-live sweep followed by stale-live reconciliation
    SyncLive,
    /// Re-verify every fixture scheduled in the recent window
    VerifyRecent,
    /// Aggregate today's prediction artifacts into recommendations
    Aggregate {
        /// Write golden and value bets to CSV in the artifacts directory
        #[arg(long)]
        save_csv: bool,
        /// Write the full snapshot as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn synchronizer(settings: &Settings) -> Result<LiveStateSynchronizer> {
    let provider = Arc::new(settings.provider()?);
    let store = Arc::new(settings.open_store()?);
    Ok(LiveStateSynchronizer::new(
        provider,
        store,
        settings.sync_config(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    matchday_oracle::init_tracing();

    let cli = Cli::parse();
    let settings = cli.settings;

    match cli.command {
        Command::Health => {
            settings
                .provider()?
                .health_check()
                .await
                .context("Provider health check failed")?;
            println!("Provider is reachable");
        }
        Command::SyncLive => {
            let report = synchronizer(&settings)?.sync_live().await;
            println!(
                "Active live sweep: {} of {} fixtures updated",
                report.live.updated, report.live.total
            );
            println!(
                "Stale live reconciliation: {} of {} fixtures corrected",
                report.stale.updated, report.stale.total
            );
        }
        Command::VerifyRecent => {
            let result = synchronizer(&settings)?.verify_recent_fixtures().await;
            println!(
                "Recent verification: {} of {} fixtures corrected",
                result.updated, result.total
            );
        }
        Command::Aggregate { save_csv, output } => {
            let cache = create_cache(CacheTtls::default());
            let oracle = DailyOracle::new(cache, &settings.artifacts_dir, OracleConfig::default());
            let snapshot = oracle.run().await;

            println!("DAILY ORACLE {}\n", snapshot.date);
            println!("Fixtures analysed: {}\n", snapshot.best_markets.len());

            println!("GOLDEN BETS\n");
            if snapshot.golden_bets.is_empty() {
                println!("No golden bets qualify today.");
            } else {
                for (i, bet) in snapshot.golden_bets.iter().enumerate() {
                    println!("{}. {}", i + 1, bet.format());
                }
            }

            println!("\nVALUE BETS\n");
            if snapshot.value_bets.is_empty() {
                println!("No value bets qualify today.");
            } else {
                for (i, bet) in snapshot.value_bets.iter().enumerate() {
                    println!("{}. {}", i + 1, bet.format());
                }
            }

            println!("\nBET BUILDER\n");
            match &snapshot.bet_builder {
                Some(builder) => {
                    for leg in &builder.legs {
                        println!(
                            "- {} vs {} | {} | {:.1}%",
                            leg.home_team,
                            leg.away_team,
                            leg.market,
                            leg.probability * 100.0
                        );
                    }
                    println!(
                        "Combined: {:.1}% @ {:.2}",
                        builder.combined_probability * 100.0,
                        builder.combined_odds
                    );
                }
                None => println!("Not enough strong legs for a bet builder today."),
            }

            if save_csv {
                let golden_csv = settings.artifacts_dir.join("golden_bets.csv");
                let value_csv = settings.artifacts_dir.join("value_bets.csv");
                save_golden_bets_to_csv(&snapshot.golden_bets, &golden_csv)?;
                save_value_bets_to_csv(&snapshot.value_bets, &value_csv)?;
                println!("\nSaved golden bets to {}", golden_csv.display());
                println!("Saved value bets to {}", value_csv.display());
            }

            if let Some(path) = output {
                save_json(&snapshot, &path)?;
                println!("Saved snapshot to {}", path.display());
            }
        }
    }

    Ok(())
}
