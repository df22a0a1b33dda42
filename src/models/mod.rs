use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type FixtureId = u64;

/// A team as referenced by a fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
}

/// Home/away goal pair. Either side is null until the match kicks off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

/// Per-team match statistics as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStatistics {
    pub shots_on_goal: Option<u32>,
    pub total_shots: Option<u32>,
    pub corners: Option<u32>,
    pub fouls: Option<u32>,
    pub yellow_cards: Option<u32>,
    pub red_cards: Option<u32>,
    pub offsides: Option<u32>,
    /// Ball possession in percent (0-100)
    pub possession: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureStatistics {
    pub home: TeamStatistics,
    pub away: TeamStatistics,
}

/// A fixture as held by the fixture store.
///
/// The score is kept twice: as flat `home_score`/`away_score` numbers and as
/// the embedded `score` object. Dashboard consumers read either, so every
/// write keeps the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: FixtureId,
    pub date: DateTime<Utc>,
    pub home_team: Team,
    pub away_team: Team,
    pub league_id: u64,
    pub status: FixtureStatus,
    pub raw_status: String,
    pub elapsed: Option<u32>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub score: Score,
    pub statistics: Option<FixtureStatistics>,
    pub last_updated: DateTime<Utc>,
}

impl Fixture {
    /// Current score, preferring the flat fields
    pub fn current_score(&self) -> Score {
        Score {
            home: self.home_score.or(self.score.home),
            away: self.away_score.or(self.score.away),
        }
    }

    /// Apply a provider-derived update in place
    pub fn apply(&mut self, update: &FixtureUpdate) {
        self.status = update.status.clone();
        self.raw_status = update.raw_status.clone();
        self.elapsed = update.elapsed;
        self.home_score = update.score.home;
        self.away_score = update.score.away;
        self.score = update.score;
        if let Some(statistics) = &update.statistics {
            self.statistics = Some(statistics.clone());
        }
        self.last_updated = update.last_updated;
    }
}

impl From<&FixtureUpdate> for Fixture {
    fn from(update: &FixtureUpdate) -> Self {
        Fixture {
            id: update.id,
            date: update.date,
            home_team: update.home_team.clone(),
            away_team: update.away_team.clone(),
            league_id: update.league_id,
            status: update.status.clone(),
            raw_status: update.raw_status.clone(),
            elapsed: update.elapsed,
            home_score: update.score.home,
            away_score: update.score.away,
            score: update.score,
            statistics: update.statistics.clone(),
            last_updated: update.last_updated,
        }
    }
}

/// Patch written into the fixture store by the synchronizer.
///
/// The descriptive fields (`date`, teams, `league_id`) are only used when the
/// fixture is not yet known to the store. `statistics: None` leaves any
/// previously stored statistics untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureUpdate {
    pub id: FixtureId,
    pub date: DateTime<Utc>,
    pub home_team: Team,
    pub away_team: Team,
    pub league_id: u64,
    pub status: FixtureStatus,
    pub raw_status: String,
    pub elapsed: Option<u32>,
    pub score: Score,
    pub statistics: Option<FixtureStatistics>,
    pub last_updated: DateTime<Utc>,
}

impl FixtureUpdate {
    /// Build an update from a fresh provider read
    pub fn from_provider(
        fixture: &Fixture,
        statistics: Option<FixtureStatistics>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: fixture.id,
            date: fixture.date,
            home_team: fixture.home_team.clone(),
            away_team: fixture.away_team.clone(),
            league_id: fixture.league_id,
            status: fixture.status.clone(),
            raw_status: fixture.raw_status.clone(),
            elapsed: fixture.elapsed,
            score: fixture.current_score(),
            statistics,
            last_updated: now,
        }
    }
}

/// Normalized fixture status used throughout the store and dashboard
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FixtureStatus {
    Scheduled,
    Live,
    Finished,
    Postponed,
    Cancelled,
    Abandoned,
    /// Raw provider code with no mapping, kept verbatim
    Other(String),
}

impl FixtureStatus {
    pub fn as_str(&self) -> &str {
        match self {
            FixtureStatus::Scheduled => "scheduled",
            FixtureStatus::Live => "live",
            FixtureStatus::Finished => "finished",
            FixtureStatus::Postponed => "postponed",
            FixtureStatus::Cancelled => "cancelled",
            FixtureStatus::Abandoned => "abandoned",
            FixtureStatus::Other(code) => code,
        }
    }
}

impl From<String> for FixtureStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "scheduled" => FixtureStatus::Scheduled,
            "live" => FixtureStatus::Live,
            "finished" => FixtureStatus::Finished,
            "postponed" => FixtureStatus::Postponed,
            "cancelled" => FixtureStatus::Cancelled,
            "abandoned" => FixtureStatus::Abandoned,
            _ => FixtureStatus::Other(value),
        }
    }
}

impl From<FixtureStatus> for String {
    fn from(status: FixtureStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for FixtureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short status codes reported by the sports-data provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    NotStarted,
    ToBeDefined,
    FirstHalf,
    HalfTime,
    SecondHalf,
    ExtraTime,
    BreakTime,
    Penalties,
    Suspended,
    Interrupted,
    FullTime,
    AfterExtraTime,
    PenaltiesFinished,
    Awarded,
    WalkOver,
    Postponed,
    Cancelled,
    Abandoned,
    Unmapped(String),
}

impl RawStatus {
    pub fn parse(code: &str) -> Self {
        match code.trim() {
            "NS" => RawStatus::NotStarted,
            "TBD" => RawStatus::ToBeDefined,
            "1H" => RawStatus::FirstHalf,
            "HT" => RawStatus::HalfTime,
            "2H" => RawStatus::SecondHalf,
            "ET" => RawStatus::ExtraTime,
            "BT" => RawStatus::BreakTime,
            "P" => RawStatus::Penalties,
            "SUSP" => RawStatus::Suspended,
            "INT" => RawStatus::Interrupted,
            "FT" => RawStatus::FullTime,
            "AET" => RawStatus::AfterExtraTime,
            "PEN" => RawStatus::PenaltiesFinished,
            "AWD" => RawStatus::Awarded,
            "WO" => RawStatus::WalkOver,
            "PST" => RawStatus::Postponed,
            "CANC" => RawStatus::Cancelled,
            "ABD" => RawStatus::Abandoned,
            other => RawStatus::Unmapped(other.to_string()),
        }
    }

    pub fn normalize(&self) -> FixtureStatus {
        match self {
            RawStatus::NotStarted | RawStatus::ToBeDefined => FixtureStatus::Scheduled,
            RawStatus::FirstHalf
            | RawStatus::HalfTime
            | RawStatus::SecondHalf
            | RawStatus::ExtraTime
            | RawStatus::BreakTime
            | RawStatus::Penalties
            | RawStatus::Suspended
            | RawStatus::Interrupted => FixtureStatus::Live,
            RawStatus::FullTime
            | RawStatus::AfterExtraTime
            | RawStatus::PenaltiesFinished
            | RawStatus::Awarded
            | RawStatus::WalkOver => FixtureStatus::Finished,
            RawStatus::Postponed => FixtureStatus::Postponed,
            RawStatus::Cancelled => FixtureStatus::Cancelled,
            RawStatus::Abandoned => FixtureStatus::Abandoned,
            RawStatus::Unmapped(code) => FixtureStatus::Other(code.clone()),
        }
    }
}

/// Map a raw provider code to its normalized status, logging codes we don't know
pub fn normalize_status(code: &str) -> FixtureStatus {
    let raw = RawStatus::parse(code);
    if let RawStatus::Unmapped(code) = &raw {
        tracing::warn!(raw_status = %code, "Unmapped provider status code, storing verbatim");
    }
    raw.normalize()
}
