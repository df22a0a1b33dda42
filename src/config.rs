use crate::api::football_api::{FootballApiClient, DEFAULT_BASE_URL};
use crate::scheduler::Schedule;
use crate::store::MemoryFixtureStore;
use crate::sync::SyncConfig;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, read from flags with `.env`/environment fallbacks
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// API-Football key
    #[arg(long, env = "API_FOOTBALL_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "API_FOOTBALL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Timeout for provider data calls, in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = 15)]
    pub provider_timeout_secs: u64,

    /// Timeout for the provider health check, in seconds
    #[arg(long, env = "PROVIDER_HEALTH_TIMEOUT_SECS", default_value_t = 5)]
    pub health_timeout_secs: u64,

    /// Pause between per-fixture provider calls, in milliseconds
    #[arg(long, env = "SYNC_CALL_DELAY_MS", default_value_t = 50)]
    pub call_delay_ms: u64,

    /// Window for stale-live reconciliation, 1 to 168 hours
    #[arg(
        long,
        env = "STALE_LIVE_WINDOW_HOURS",
        default_value_t = 3,
        value_parser = clap::value_parser!(i64).range(1..=168)
    )]
    pub stale_live_window_hours: i64,

    /// Window for recent-fixture verification, 1 to 168 hours
    #[arg(
        long,
        env = "RECENT_VERIFY_WINDOW_HOURS",
        default_value_t = 6,
        value_parser = clap::value_parser!(i64).range(1..=168)
    )]
    pub recent_verify_window_hours: i64,

    #[arg(long, env = "FIXTURE_STORE_PATH", default_value = "cache/fixtures.json")]
    pub fixture_store_path: PathBuf,

    /// Directory holding predictions.json, odds.json and reasoning.json
    #[arg(long, env = "ARTIFACTS_DIR", default_value = "cache/oracle")]
    pub artifacts_dir: PathBuf,

    #[arg(
        long,
        env = "DAILY_RUN_HOUR_UTC",
        default_value_t = 6,
        value_parser = clap::value_parser!(u32).range(0..24)
    )]
    pub daily_run_hour_utc: u32,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind_addr: String,
}

impl Settings {
    pub fn provider(&self) -> Result<FootballApiClient> {
        let api_key = self
            .api_key
            .clone()
            .context("API_FOOTBALL_KEY not set in .env file")?;

        Ok(FootballApiClient::new(api_key)
            .with_base_url(&self.base_url)
            .with_timeouts(
                Duration::from_secs(self.provider_timeout_secs),
                Duration::from_secs(self.health_timeout_secs),
            ))
    }

    pub fn open_store(&self) -> Result<MemoryFixtureStore> {
        MemoryFixtureStore::open(&self.fixture_store_path).with_context(|| {
            format!(
                "Failed to open fixture store at {}",
                self.fixture_store_path.display()
            )
        })
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            call_delay: Duration::from_millis(self.call_delay_ms),
            stale_live_window: chrono::Duration::hours(self.stale_live_window_hours),
            recent_window: chrono::Duration::hours(self.recent_verify_window_hours),
        }
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            daily_run_hour_utc: self.daily_run_hour_utc,
            ..Schedule::default()
        }
    }
}
