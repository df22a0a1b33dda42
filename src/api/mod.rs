pub mod football_api;

use crate::error::ProviderError;
use crate::models::{Fixture, FixtureId, FixtureStatistics};
use async_trait::async_trait;

pub use football_api::FootballApiClient;

/// The external sports-data provider as consumed by the synchronizer
#[async_trait]
pub trait SportsDataProvider: Send + Sync {
    /// Every fixture the provider currently reports as in play, across all leagues
    async fn fetch_live_fixtures(&self) -> Result<Vec<Fixture>, ProviderError>;

    async fn fetch_fixture(&self, id: FixtureId) -> Result<Fixture, ProviderError>;

    /// `Ok(None)` when the provider has no statistics for the fixture yet
    async fn fetch_statistics(
        &self,
        id: FixtureId,
    ) -> Result<Option<FixtureStatistics>, ProviderError>;
}
