use anyhow::{Context, Result};
use clap::Parser;
use matchday_oracle::cache::{create_cache, CacheTtls};
use matchday_oracle::config::Settings;
use matchday_oracle::oracle::{DailyOracle, OracleConfig};
use matchday_oracle::scheduler::spawn_jobs;
use matchday_oracle::server::{router, AppState};
use matchday_oracle::sync::LiveStateSynchronizer;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "web", about = "Matchday oracle background jobs and JSON read surface")]
struct Cli {
    #[command(flatten)]
    settings: Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    matchday_oracle::init_tracing();

    let settings = Cli::parse().settings;

    let provider = Arc::new(settings.provider()?);
    match provider.health_check().await {
        Ok(()) => info!("Provider is reachable"),
        Err(e) => warn!(error = %e, "Provider health check failed; sweeps will retry on schedule"),
    }

    let store = Arc::new(settings.open_store()?);
    let cache = create_cache(CacheTtls::default());

    let synchronizer = Arc::new(LiveStateSynchronizer::new(
        provider,
        store,
        settings.sync_config(),
    ));
    let oracle = Arc::new(DailyOracle::new(
        cache.clone(),
        &settings.artifacts_dir,
        OracleConfig::default(),
    ));

    let _jobs = spawn_jobs(synchronizer, oracle.clone(), settings.schedule());

    let app = router(AppState { cache, oracle });

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    info!(addr = %settings.bind_addr, "Serving JSON read surface");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
