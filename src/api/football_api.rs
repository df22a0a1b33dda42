use crate::api::SportsDataProvider;
use crate::error::ProviderError;
use crate::models::{
    normalize_status, Fixture, FixtureId, FixtureStatistics, Score, Team, TeamStatistics,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Envelope wrapping every API-Football response
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    errors: serde_json::Value,
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ApiFixtureItem {
    fixture: ApiFixture,
    league: ApiLeague,
    teams: ApiTeams,
    goals: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiFixture {
    id: FixtureId,
    date: DateTime<Utc>,
    status: ApiStatus,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    short: String,
    elapsed: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ApiTeams {
    home: ApiTeam,
    away: ApiTeam,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiGoals {
    home: Option<u32>,
    away: Option<u32>,
}

/// One team's block in the `/fixtures/statistics` response
#[derive(Debug, Deserialize)]
struct ApiTeamStatistics {
    #[allow(dead_code)]
    team: ApiTeam,
    statistics: Vec<ApiStatistic>,
}

#[derive(Debug, Deserialize)]
struct ApiStatistic {
    #[serde(rename = "type")]
    kind: String,
    value: serde_json::Value,
}

impl ApiFixtureItem {
    fn into_fixture(self, now: DateTime<Utc>) -> Fixture {
        let score = Score {
            home: self.goals.home,
            away: self.goals.away,
        };
        Fixture {
            id: self.fixture.id,
            date: self.fixture.date,
            home_team: Team {
                id: self.teams.home.id,
                name: self.teams.home.name,
            },
            away_team: Team {
                id: self.teams.away.id,
                name: self.teams.away.name,
            },
            league_id: self.league.id,
            status: normalize_status(&self.fixture.status.short),
            raw_status: self.fixture.status.short,
            elapsed: self.fixture.status.elapsed,
            home_score: score.home,
            away_score: score.away,
            score,
            statistics: None,
            last_updated: now,
        }
    }
}

/// Statistic values arrive as numbers, percent strings ("55%") or null
fn stat_value(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn team_statistics(block: &ApiTeamStatistics) -> TeamStatistics {
    let mut stats = TeamStatistics::default();
    for stat in &block.statistics {
        let value = stat_value(&stat.value);
        match stat.kind.as_str() {
            "Shots on Goal" => stats.shots_on_goal = value,
            "Total Shots" => stats.total_shots = value,
            "Corner Kicks" => stats.corners = value,
            "Fouls" => stats.fouls = value,
            "Yellow Cards" => stats.yellow_cards = value,
            "Red Cards" => stats.red_cards = value,
            "Offsides" => stats.offsides = value,
            "Ball Possession" => stats.possession = value,
            _ => {}
        }
    }
    stats
}

/// An empty `errors` field comes back as `[]` or `{}`
fn api_errors(errors: &serde_json::Value) -> Option<String> {
    match errors {
        serde_json::Value::Array(items) if !items.is_empty() => Some(errors.to_string()),
        serde_json::Value::Object(map) if !map.is_empty() => Some(errors.to_string()),
        _ => None,
    }
}

/// Client for the API-Football v3 service
pub struct FootballApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    health_timeout: Duration,
}

impl FootballApiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
            health_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeouts(mut self, timeout: Duration, health_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.health_timeout = health_timeout;
        self
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<Vec<T>, ProviderError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| timeout_or_http(e, &url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| timeout_or_http(e, &url))?;
        let envelope: ApiEnvelope<T> = serde_json::from_slice(&bytes)?;

        if let Some(errors) = api_errors(&envelope.errors) {
            return Err(ProviderError::Api(errors));
        }

        Ok(envelope.response)
    }

    /// Lightweight request against `/status` to confirm the key and the service are up
    pub async fn health_check(&self) -> Result<(), ProviderError> {
        let url = format!("{}/status", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| timeout_or_http(e, &url))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
                body: String::new(),
            });
        }

        if let Some(remaining) = response.headers().get("x-ratelimit-requests-remaining") {
            tracing::info!(remaining = ?remaining, "Provider daily requests remaining");
        }

        Ok(())
    }
}

fn timeout_or_http(err: reqwest::Error, url: &str) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(url.to_string())
    } else {
        ProviderError::Http(err)
    }
}

#[async_trait]
impl SportsDataProvider for FootballApiClient {
    async fn fetch_live_fixtures(&self) -> Result<Vec<Fixture>, ProviderError> {
        let items: Vec<ApiFixtureItem> = self
            .get("/fixtures", &[("live", "all".to_string())], self.timeout)
            .await?;

        let now = Utc::now();
        Ok(items.into_iter().map(|item| item.into_fixture(now)).collect())
    }

    async fn fetch_fixture(&self, id: FixtureId) -> Result<Fixture, ProviderError> {
        let items: Vec<ApiFixtureItem> = self
            .get("/fixtures", &[("id", id.to_string())], self.timeout)
            .await?;

        items
            .into_iter()
            .next()
            .map(|item| item.into_fixture(Utc::now()))
            .ok_or(ProviderError::NotFound(id))
    }

    async fn fetch_statistics(
        &self,
        id: FixtureId,
    ) -> Result<Option<FixtureStatistics>, ProviderError> {
        let blocks: Vec<ApiTeamStatistics> = self
            .get(
                "/fixtures/statistics",
                &[("fixture", id.to_string())],
                self.timeout,
            )
            .await?;

        // Home team block comes first
        match blocks.as_slice() {
            [home, away, ..] => Ok(Some(FixtureStatistics {
                home: team_statistics(home),
                away: team_statistics(away),
            })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FixtureStatus;

    const LIVE_RESPONSE: &str = r#"{
        "get": "fixtures",
        "errors": [],
        "results": 1,
        "response": [{
            "fixture": {
                "id": 868123,
                "date": "2026-10-18T14:00:00+00:00",
                "status": { "long": "Second Half", "short": "2H", "elapsed": 67 }
            },
            "league": { "id": 39, "name": "Premier League" },
            "teams": {
                "home": { "id": 33, "name": "Manchester United" },
                "away": { "id": 40, "name": "Liverpool" }
            },
            "goals": { "home": 1, "away": 2 }
        }]
    }"#;

    const STATISTICS_RESPONSE: &str = r#"{
        "errors": {},
        "response": [
            { "team": { "id": 33, "name": "Manchester United" }, "statistics": [
                { "type": "Shots on Goal", "value": 4 },
                { "type": "Corner Kicks", "value": 6 },
                { "type": "Ball Possession", "value": "44%" },
                { "type": "Red Cards", "value": null }
            ]},
            { "team": { "id": 40, "name": "Liverpool" }, "statistics": [
                { "type": "Shots on Goal", "value": 7 },
                { "type": "Ball Possession", "value": "56%" }
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_live_fixture() {
        let envelope: ApiEnvelope<ApiFixtureItem> = serde_json::from_str(LIVE_RESPONSE).unwrap();
        assert!(api_errors(&envelope.errors).is_none());

        let now = Utc::now();
        let fixture = envelope.response.into_iter().next().unwrap().into_fixture(now);
        assert_eq!(fixture.id, 868123);
        assert_eq!(fixture.status, FixtureStatus::Live);
        assert_eq!(fixture.raw_status, "2H");
        assert_eq!(fixture.elapsed, Some(67));
        assert_eq!(fixture.home_score, Some(1));
        assert_eq!(fixture.score.away, Some(2));
        assert_eq!(fixture.away_team.name, "Liverpool");
    }

    #[test]
    fn test_parse_statistics() {
        let envelope: ApiEnvelope<ApiTeamStatistics> =
            serde_json::from_str(STATISTICS_RESPONSE).unwrap();
        let home = team_statistics(&envelope.response[0]);
        let away = team_statistics(&envelope.response[1]);

        assert_eq!(home.shots_on_goal, Some(4));
        assert_eq!(home.corners, Some(6));
        assert_eq!(home.possession, Some(44));
        assert_eq!(home.red_cards, None);
        assert_eq!(away.possession, Some(56));
    }

    #[test]
    fn test_api_errors_detected() {
        let errors = serde_json::json!({ "token": "Error/Missing application key" });
        assert!(api_errors(&errors).is_some());
        assert!(api_errors(&serde_json::json!([])).is_none());
        assert!(api_errors(&serde_json::Value::Null).is_none());
    }

    #[test]
    fn test_stat_value_rejects_out_of_range_numbers() {
        assert_eq!(stat_value(&serde_json::json!(12)), Some(12));
        assert_eq!(stat_value(&serde_json::json!(" 61% ")), Some(61));
        assert_eq!(stat_value(&serde_json::json!(4_294_967_296u64)), None);
        assert_eq!(stat_value(&serde_json::json!(-3)), None);
        assert_eq!(stat_value(&serde_json::Value::Null), None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetch_live_fixtures() {
        dotenv::dotenv().ok();
        let api_key = std::env::var("API_FOOTBALL_KEY").expect("API_FOOTBALL_KEY not set");
        let client = FootballApiClient::new(api_key);

        client.health_check().await.unwrap();
        let fixtures = client.fetch_live_fixtures().await.unwrap();
        println!("Found {} live fixtures", fixtures.len());
    }
}
