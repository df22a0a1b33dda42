use crate::error::StoreError;
use crate::models::{Fixture, FixtureId, FixtureStatus, FixtureUpdate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Query/update contract of the persisted fixture store.
///
/// Every mutation is a single-fixture upsert keyed by id, so concurrent
/// writers never touch unrelated fixtures.
#[async_trait]
pub trait FixtureStore: Send + Sync {
    /// Fixtures with `status` whose scheduled time falls in `[from, to]`
    async fn find_by_status(
        &self,
        status: &FixtureStatus,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, StoreError>;

    /// Fixtures of any status whose scheduled time falls in `[from, to]`
    async fn find_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, StoreError>;

    async fn find_by_id(&self, id: FixtureId) -> Result<Option<Fixture>, StoreError>;

    /// Insert the fixture if unknown, otherwise patch status/score/statistics/lastUpdated
    async fn upsert(&self, update: &FixtureUpdate) -> Result<(), StoreError>;

    /// Persist buffered writes. Stores that write through have nothing to do.
    async fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-process fixture store with optional JSON snapshot persistence
#[derive(Default)]
pub struct MemoryFixtureStore {
    fixtures: RwLock<HashMap<FixtureId, Fixture>>,
    path: Option<PathBuf>,
}

impl MemoryFixtureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by a JSON snapshot, loading it if it exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let fixtures = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            let list: Vec<Fixture> = serde_json::from_str(&json)?;
            list.into_iter().map(|f| (f.id, f)).collect()
        } else {
            HashMap::new()
        };

        tracing::info!(path = %path.display(), fixtures = fixtures.len(), "Opened fixture store");

        Ok(Self {
            fixtures: RwLock::new(fixtures),
            path: Some(path),
        })
    }

    pub async fn insert(&self, fixture: Fixture) {
        self.fixtures.write().await.insert(fixture.id, fixture);
    }

    pub async fn len(&self) -> usize {
        self.fixtures.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.fixtures.read().await.is_empty()
    }

    async fn select<F>(&self, predicate: F) -> Vec<Fixture>
    where
        F: Fn(&Fixture) -> bool,
    {
        let mut matches: Vec<Fixture> = self
            .fixtures
            .read()
            .await
            .values()
            .filter(|f| predicate(f))
            .cloned()
            .collect();
        matches.sort_by_key(|f| (f.date, f.id));
        matches
    }
}

#[async_trait]
impl FixtureStore for MemoryFixtureStore {
    async fn find_by_status(
        &self,
        status: &FixtureStatus,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, StoreError> {
        Ok(self
            .select(|f| &f.status == status && f.date >= from && f.date <= to)
            .await)
    }

    async fn find_in_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, StoreError> {
        Ok(self.select(|f| f.date >= from && f.date <= to).await)
    }

    async fn find_by_id(&self, id: FixtureId) -> Result<Option<Fixture>, StoreError> {
        Ok(self.fixtures.read().await.get(&id).cloned())
    }

    async fn upsert(&self, update: &FixtureUpdate) -> Result<(), StoreError> {
        let mut fixtures = self.fixtures.write().await;
        match fixtures.get_mut(&update.id) {
            Some(fixture) => fixture.apply(update),
            None => {
                fixtures.insert(update.id, Fixture::from(update));
            }
        }
        Ok(())
    }

    /// Write the current contents to the snapshot file, if one is configured
    async fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let mut list: Vec<Fixture> = self.fixtures.read().await.values().cloned().collect();
        list.sort_by_key(|f| (f.date, f.id));

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&list)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
