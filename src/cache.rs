use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::utils::oracle::{GoldenBetCandidate, OracleSnapshot, ValueBetCandidate};

/// Named slots held by the cache. At most one entry per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheSlot {
    GoldenBets,
    ValueBets,
    DailyOracle,
}

impl CacheSlot {
    pub const ALL: [CacheSlot; 3] = [
        CacheSlot::GoldenBets,
        CacheSlot::ValueBets,
        CacheSlot::DailyOracle,
    ];
}

impl fmt::Display for CacheSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheSlot::GoldenBets => "golden bets",
            CacheSlot::ValueBets => "value bets",
            CacheSlot::DailyOracle => "daily oracle",
        };
        f.write_str(name)
    }
}

/// Cached value wrapper, one variant per slot
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CachePayload {
    GoldenBets(Vec<GoldenBetCandidate>),
    ValueBets(Vec<ValueBetCandidate>),
    DailyOracle(OracleSnapshot),
}

impl CachePayload {
    pub fn slot(&self) -> CacheSlot {
        match self {
            CachePayload::GoldenBets(_) => CacheSlot::GoldenBets,
            CachePayload::ValueBets(_) => CacheSlot::ValueBets,
            CachePayload::DailyOracle(_) => CacheSlot::DailyOracle,
        }
    }

    /// Item count for list payloads; a snapshot is not a countable collection
    pub fn item_count(&self) -> Option<usize> {
        match self {
            CachePayload::GoldenBets(bets) => Some(bets.len()),
            CachePayload::ValueBets(bets) => Some(bets.len()),
            CachePayload::DailyOracle(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    /// `None` means the entry never expires on its own and lives until overwritten
    pub expires_at: Option<DateTime<Utc>>,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now > expires_at)
    }
}

/// Per-slot time-to-live policy
#[derive(Debug, Clone)]
pub struct CacheTtls {
    pub golden_bets: Option<Duration>,
    pub value_bets: Option<Duration>,
    pub daily_oracle: Option<Duration>,
    /// Reads of a never-expiring entry older than this log a warning
    pub stale_warning: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            golden_bets: Some(Duration::hours(24)),
            value_bets: Some(Duration::hours(24)),
            daily_oracle: None,
            stale_warning: Duration::hours(36),
        }
    }
}

impl CacheTtls {
    pub fn ttl(&self, slot: CacheSlot) -> Option<Duration> {
        match slot {
            CacheSlot::GoldenBets => self.golden_bets,
            CacheSlot::ValueBets => self.value_bets,
            CacheSlot::DailyOracle => self.daily_oracle,
        }
    }
}

/// Diagnostics for one slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotStatus {
    Empty,
    Populated {
        items: Option<usize>,
        age_minutes: i64,
        expires_in_minutes: Option<i64>,
    },
}

/// In-memory store for expensive derived collections.
///
/// Expired entries are evicted lazily on read, so callers only ever see
/// fresh data or a miss.
pub struct TtlCache {
    entries: DashMap<CacheSlot, CacheEntry<CachePayload>>,
    ttls: CacheTtls,
}

impl TtlCache {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            entries: DashMap::new(),
            ttls,
        }
    }

    /// Store a payload in its slot, replacing whatever was there
    pub fn set(&self, payload: CachePayload) {
        self.set_at(payload, Utc::now());
    }

    pub fn set_at(&self, payload: CachePayload, now: DateTime<Utc>) {
        let slot = payload.slot();
        let entry = CacheEntry {
            data: payload,
            timestamp: now,
            expires_at: self.ttls.ttl(slot).map(|ttl| now + ttl),
        };
        tracing::debug!(slot = %slot, expires_at = ?entry.expires_at, "Cache slot set");
        self.entries.insert(slot, entry);
    }

    pub fn get(&self, slot: CacheSlot) -> Option<CachePayload> {
        self.get_at(slot, Utc::now())
    }

    pub fn get_at(&self, slot: CacheSlot, now: DateTime<Utc>) -> Option<CachePayload> {
        let entry = self.live_entry(slot, now)?;
        if entry.expires_at.is_none() && now - entry.timestamp > self.ttls.stale_warning {
            tracing::warn!(
                slot = %slot,
                age_hours = (now - entry.timestamp).num_hours(),
                "Serving stale cache entry; the producing job may be failing"
            );
        }
        Some(entry.data)
    }

    pub fn status(&self, slot: CacheSlot) -> SlotStatus {
        self.status_at(slot, Utc::now())
    }

    pub fn status_at(&self, slot: CacheSlot, now: DateTime<Utc>) -> SlotStatus {
        match self.live_entry(slot, now) {
            None => SlotStatus::Empty,
            Some(entry) => SlotStatus::Populated {
                items: entry.data.item_count(),
                age_minutes: (now - entry.timestamp).num_minutes(),
                expires_in_minutes: entry.expires_at.map(|at| (at - now).num_minutes()),
            },
        }
    }

    pub fn status_all(&self) -> Vec<(CacheSlot, SlotStatus)> {
        let now = Utc::now();
        CacheSlot::ALL
            .iter()
            .map(|slot| (*slot, self.status_at(*slot, now)))
            .collect()
    }

    pub fn clear(&self, slot: CacheSlot) {
        self.entries.remove(&slot);
    }

    pub fn clear_all(&self) {
        self.entries.clear();
    }

    /// Clone out the entry if present and unexpired, evicting it otherwise
    fn live_entry(&self, slot: CacheSlot, now: DateTime<Utc>) -> Option<CacheEntry<CachePayload>> {
        if let Some(entry) = self.entries.get(&slot) {
            if !entry.is_expired(now) {
                return Some(entry.clone());
            }
        } else {
            return None;
        }

        // guard dropped above; evict only if still expired
        self.entries.remove_if(&slot, |_, entry| entry.is_expired(now));
        tracing::debug!(slot = %slot, "Cache slot expired");
        None
    }

    pub fn golden_bets(&self) -> Option<Vec<GoldenBetCandidate>> {
        match self.get(CacheSlot::GoldenBets)? {
            CachePayload::GoldenBets(bets) => Some(bets),
            _ => None,
        }
    }

    pub fn value_bets(&self) -> Option<Vec<ValueBetCandidate>> {
        match self.get(CacheSlot::ValueBets)? {
            CachePayload::ValueBets(bets) => Some(bets),
            _ => None,
        }
    }

    pub fn daily_oracle(&self) -> Option<OracleSnapshot> {
        match self.get(CacheSlot::DailyOracle)? {
            CachePayload::DailyOracle(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}

/// Shared cache instance, built once at startup and handed to every component
pub type SharedCache = Arc<TtlCache>;

pub fn create_cache(ttls: CacheTtls) -> SharedCache {
    Arc::new(TtlCache::new(ttls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::oracle::{Market, OracleSnapshot};
    use chrono::NaiveDate;

    fn golden(fixture_id: u64) -> GoldenBetCandidate {
        GoldenBetCandidate {
            fixture_id,
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            league: None,
            kickoff: None,
            market: Market::Over25Goals,
            probability: 0.8,
            odds: Some(1.7),
            reasoning: None,
        }
    }

    fn snapshot() -> OracleSnapshot {
        OracleSnapshot {
            date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
            best_markets: vec![],
            golden_bets: vec![],
            value_bets: vec![],
            bet_builder: None,
        }
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = TtlCache::default();
        let t0 = Utc::now();
        cache.set_at(CachePayload::GoldenBets(vec![golden(1)]), t0);

        let almost = t0 + Duration::hours(23) + Duration::minutes(59);
        assert!(cache.get_at(CacheSlot::GoldenBets, almost).is_some());

        let after = t0 + Duration::hours(24) + Duration::minutes(1);
        assert!(cache.get_at(CacheSlot::GoldenBets, after).is_none());
        assert_eq!(cache.status_at(CacheSlot::GoldenBets, after), SlotStatus::Empty);
        // evicted, so even an earlier clock no longer sees it
        assert!(cache.get_at(CacheSlot::GoldenBets, t0).is_none());
    }

    #[test]
    fn test_read_at_exact_expiry_is_a_hit() {
        let cache = TtlCache::default();
        let t0 = Utc::now();
        cache.set_at(CachePayload::GoldenBets(vec![]), t0);
        assert!(cache.get_at(CacheSlot::GoldenBets, t0 + Duration::hours(24)).is_some());
    }

    #[test]
    fn test_status_reports_count_age_and_expiry() {
        let cache = TtlCache::default();
        let t0 = Utc::now();
        cache.set_at(CachePayload::GoldenBets(vec![golden(1), golden(2)]), t0);

        let status = cache.status_at(CacheSlot::GoldenBets, t0 + Duration::minutes(90));
        assert_eq!(
            status,
            SlotStatus::Populated {
                items: Some(2),
                age_minutes: 90,
                expires_in_minutes: Some(24 * 60 - 90),
            }
        );
        assert_eq!(cache.status(CacheSlot::ValueBets), SlotStatus::Empty);
    }

    #[test]
    fn test_oracle_slot_never_expires() {
        let cache = TtlCache::default();
        let t0 = Utc::now();
        cache.set_at(CachePayload::DailyOracle(snapshot()), t0);

        let much_later = t0 + Duration::days(10);
        assert!(cache.get_at(CacheSlot::DailyOracle, much_later).is_some());
        match cache.status_at(CacheSlot::DailyOracle, much_later) {
            SlotStatus::Populated {
                items,
                expires_in_minutes,
                ..
            } => {
                assert_eq!(items, None);
                assert_eq!(expires_in_minutes, None);
            }
            SlotStatus::Empty => panic!("oracle slot should still be populated"),
        }
    }

    #[test]
    fn test_set_overwrites_and_clear_invalidates() {
        let cache = TtlCache::default();
        cache.set(CachePayload::GoldenBets(vec![golden(1)]));
        cache.set(CachePayload::GoldenBets(vec![golden(2), golden(3)]));
        let bets = cache.golden_bets().unwrap();
        assert_eq!(bets.iter().map(|b| b.fixture_id).collect::<Vec<_>>(), vec![2, 3]);

        cache.set(CachePayload::ValueBets(vec![]));
        cache.clear(CacheSlot::GoldenBets);
        assert!(cache.golden_bets().is_none());
        assert!(cache.value_bets().is_some());

        cache.clear_all();
        assert!(cache
            .status_all()
            .iter()
            .all(|(_, status)| *status == SlotStatus::Empty));
    }
}
