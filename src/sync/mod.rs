use crate::api::SportsDataProvider;
use crate::error::SyncError;
use crate::models::{Fixture, FixtureId, FixtureStatus, FixtureUpdate};
use crate::store::FixtureStore;
use chrono::{Duration, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of one sweep: how many fixtures were written out of how many were checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepResult {
    pub updated: usize,
    pub total: usize,
}

/// Both sweeps of one live-sync invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LiveSyncReport {
    pub live: SweepResult,
    pub stale: SweepResult,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Pause before every per-fixture provider call, to stay under the rate limit
    pub call_delay: std::time::Duration,
    /// Stored "live" fixtures older than this are re-checked by the stale sweep
    pub stale_live_window: Duration,
    /// Every fixture scheduled within this window is re-checked by the recent verification
    pub recent_window: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            call_delay: std::time::Duration::from_millis(50),
            stale_live_window: Duration::hours(3),
            recent_window: Duration::hours(6),
        }
    }
}

/// Keeps the fixture store's status and scores in line with the provider.
///
/// Fixtures are processed one at a time with a fixed pause between provider
/// calls. Per-fixture failures are logged and skipped; only a failure of the
/// initial bulk query aborts a sweep, which then reports zero.
pub struct LiveStateSynchronizer {
    provider: Arc<dyn SportsDataProvider>,
    store: Arc<dyn FixtureStore>,
    config: SyncConfig,
}

impl LiveStateSynchronizer {
    pub fn new(
        provider: Arc<dyn SportsDataProvider>,
        store: Arc<dyn FixtureStore>,
        config: SyncConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Fast-cadence entry point: active-live sweep, then stale-live reconciliation
    /// of whatever the first sweep did not already handle
    pub async fn sync_live(&self) -> LiveSyncReport {
        let (live, handled) = self.active_live_sweep().await;
        let stale = self.stale_reconciliation_sweep(&handled).await;
        self.flush_store().await;

        info!(
            live_updated = live.updated,
            live_total = live.total,
            stale_updated = stale.updated,
            stale_total = stale.total,
            "Live sync complete"
        );
        LiveSyncReport { live, stale }
    }

    pub async fn run_active_live_sweep(&self) -> SweepResult {
        let (result, _) = self.active_live_sweep().await;
        self.flush_store().await;
        result
    }

    pub async fn run_stale_reconciliation_sweep(&self) -> SweepResult {
        let result = self.stale_reconciliation_sweep(&HashSet::new()).await;
        self.flush_store().await;
        result
    }

    /// Re-check every fixture scheduled in the recent window, whatever its stored status.
    /// Catches matches that went live and finished between two fast sweeps.
    pub async fn verify_recent_fixtures(&self) -> SweepResult {
        let now = Utc::now();
        let fixtures = match self
            .store
            .find_in_range(now - self.config.recent_window, now)
            .await
        {
            Ok(fixtures) => fixtures,
            Err(e) => {
                error!(error = %e, "Failed to query recent fixtures");
                return SweepResult::default();
            }
        };

        let result = self.reconcile_all(&fixtures).await;
        self.flush_store().await;
        info!(
            updated = result.updated,
            total = result.total,
            "Recent fixture verification complete"
        );
        result
    }

    async fn active_live_sweep(&self) -> (SweepResult, HashSet<FixtureId>) {
        let mut handled = HashSet::new();

        let live = match self.provider.fetch_live_fixtures().await {
            Ok(live) => live,
            Err(e) => {
                error!(error = %e, "Failed to fetch live fixtures");
                return (SweepResult::default(), handled);
            }
        };

        let mut result = SweepResult {
            updated: 0,
            total: live.len(),
        };

        for fixture in &live {
            handled.insert(fixture.id);
            self.throttle().await;

            // Statistics are best-effort; the score update goes ahead without them
            let statistics = match self.provider.fetch_statistics(fixture.id).await {
                Ok(statistics) => statistics,
                Err(e) => {
                    warn!(fixture_id = fixture.id, error = %e, "Failed to fetch statistics");
                    None
                }
            };

            let update = FixtureUpdate::from_provider(fixture, statistics, Utc::now());
            match self.store.upsert(&update).await {
                Ok(()) => result.updated += 1,
                Err(e) => error!(fixture_id = fixture.id, error = %e, "Failed to store live fixture"),
            }
        }

        (result, handled)
    }

    async fn stale_reconciliation_sweep(&self, exclude: &HashSet<FixtureId>) -> SweepResult {
        let now = Utc::now();
        let stored = match self
            .store
            .find_by_status(
                &FixtureStatus::Live,
                now - self.config.stale_live_window,
                now,
            )
            .await
        {
            Ok(stored) => stored,
            Err(e) => {
                error!(error = %e, "Failed to query stored live fixtures");
                return SweepResult::default();
            }
        };

        let candidates: Vec<Fixture> = stored
            .into_iter()
            .filter(|f| !exclude.contains(&f.id))
            .collect();

        self.reconcile_all(&candidates).await
    }

    async fn reconcile_all(&self, fixtures: &[Fixture]) -> SweepResult {
        let mut result = SweepResult {
            updated: 0,
            total: fixtures.len(),
        };

        for stored in fixtures {
            self.throttle().await;
            match self.reconcile(stored).await {
                Ok(true) => result.updated += 1,
                Ok(false) => {}
                Err(e) => warn!(fixture_id = stored.id, error = %e, "Failed to reconcile fixture"),
            }
        }

        result
    }

    /// Fetch a fixture directly and write a correction if status or score drifted.
    /// Returns whether a correction was written.
    async fn reconcile(&self, stored: &Fixture) -> Result<bool, SyncError> {
        let fresh = self.provider.fetch_fixture(stored.id).await?;

        let status_changed = fresh.status != stored.status;
        let score_changed = fresh.current_score() != stored.current_score();
        if !status_changed && !score_changed {
            return Ok(false);
        }

        let update = FixtureUpdate::from_provider(&fresh, None, Utc::now());
        self.store.upsert(&update).await?;

        info!(
            fixture_id = stored.id,
            from = %stored.status,
            to = %fresh.status,
            raw_status = %fresh.raw_status,
            "Corrected fixture state"
        );
        Ok(true)
    }

    async fn flush_store(&self) {
        if let Err(e) = self.store.flush().await {
            error!(error = %e, "Failed to persist fixture store");
        }
    }

    async fn throttle(&self) {
        if !self.config.call_delay.is_zero() {
            tokio::time::sleep(self.config.call_delay).await;
        }
    }
}
