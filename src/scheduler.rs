use crate::sync::LiveStateSynchronizer;
use crate::utils::oracle::DailyOracle;
use chrono::{DateTime, Duration, Timelike, Utc};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::info;

/// Cadence of the background jobs
#[derive(Debug, Clone)]
pub struct Schedule {
    pub live_sync_every: std::time::Duration,
    pub recent_verify_every: std::time::Duration,
    pub daily_run_hour_utc: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            live_sync_every: std::time::Duration::from_secs(60),
            recent_verify_every: std::time::Duration::from_secs(5 * 60),
            daily_run_hour_utc: 6,
        }
    }
}

/// Time left until the next `hour:00` UTC, strictly in the future
pub fn until_next_daily_run(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let today = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .map(|naive| naive.and_utc());

    let next = match today {
        Some(run) if run > now => run,
        Some(run) => run + Duration::days(1),
        // invalid hour: fall back to the top of the next hour
        None => {
            now.with_minute(0)
                .and_then(|t| t.with_second(0))
                .and_then(|t| t.with_nanosecond(0))
                .unwrap_or(now)
                + Duration::hours(1)
        }
    };

    (next - now).to_std().unwrap_or_default()
}

/// Run `job` every `period`, first tick immediately. Runs are never overlapped.
async fn run_every<F, Fut>(period: std::time::Duration, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks = IntervalStream::new(interval);

    while ticks.next().await.is_some() {
        job().await;
    }
}

/// Spawn the live sync, recent verification and daily oracle jobs.
///
/// The two sync jobs fire once at startup; the daily oracle also runs once at
/// startup so a fresh process does not wait a day for its first snapshot.
pub fn spawn_jobs(
    synchronizer: Arc<LiveStateSynchronizer>,
    oracle: Arc<DailyOracle>,
    schedule: Schedule,
) -> Vec<JoinHandle<()>> {
    let live_sync = {
        let synchronizer = synchronizer.clone();
        tokio::spawn(run_every(schedule.live_sync_every, move || {
            let synchronizer = synchronizer.clone();
            async move {
                synchronizer.sync_live().await;
            }
        }))
    };

    let recent_verify = tokio::spawn(run_every(schedule.recent_verify_every, move || {
        let synchronizer = synchronizer.clone();
        async move {
            synchronizer.verify_recent_fixtures().await;
        }
    }));

    let hour = schedule.daily_run_hour_utc;
    let daily = tokio::spawn(async move {
        oracle.run().await;
        loop {
            let wait = until_next_daily_run(Utc::now(), hour);
            info!(minutes = wait.as_secs() / 60, "Next daily oracle run scheduled");
            tokio::time::sleep(wait).await;
            oracle.run().await;
        }
    });

    vec![live_sync, recent_verify, daily]
}
