use crate::cache::{CachePayload, CacheSlot, SharedCache};
use crate::models::FixtureId;
use crate::utils::data::load_oracle_inputs;
use crate::utils::ev_calculator::{
    calculate_edge, combined_odds, combined_probability, valid_decimal_odds,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

/// Markets scored by the external predictor, in encounter order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    #[serde(rename = "over25")]
    Over25Goals,
    #[serde(rename = "btts")]
    BothTeamsToScore,
    #[serde(rename = "corners")]
    CornersOver95,
    #[serde(rename = "cards")]
    CardsOver35,
}

impl Market {
    pub const ALL: [Market; 4] = [
        Market::Over25Goals,
        Market::BothTeamsToScore,
        Market::CornersOver95,
        Market::CardsOver35,
    ];

    /// Key used for this market in the odds and reasoning artifacts
    pub fn key(&self) -> &'static str {
        match self {
            Market::Over25Goals => "over25",
            Market::BothTeamsToScore => "btts",
            Market::CornersOver95 => "corners",
            Market::CardsOver35 => "cards",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Market::Over25Goals => "Over 2.5 Goals",
            Market::BothTeamsToScore => "Both Teams To Score",
            Market::CornersOver95 => "Over 9.5 Corners",
            Market::CardsOver35 => "Over 3.5 Cards",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-fixture market probabilities produced once a day by the predictor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketProbabilitySet {
    pub fixture_id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
    pub over25: f64,
    pub btts: f64,
    pub corners: f64,
    pub cards: f64,
}

impl MarketProbabilitySet {
    pub fn probability(&self, market: Market) -> f64 {
        match market {
            Market::Over25Goals => self.over25,
            Market::BothTeamsToScore => self.btts,
            Market::CornersOver95 => self.corners,
            Market::CardsOver35 => self.cards,
        }
    }
}

/// Decimal odds per fixture, keyed by the bookmaker's market name.
///
/// Markets the oracle does not score (e.g. `homeWin`) are kept but never read.
/// `null` fixture entries and `null` prices are allowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OddsSnapshot(pub HashMap<FixtureId, Option<HashMap<String, Option<f64>>>>);

impl OddsSnapshot {
    /// Usable odds for a market, if the snapshot has a valid price
    pub fn odds(&self, fixture_id: FixtureId, market: Market) -> Option<f64> {
        self.0
            .get(&fixture_id)?
            .as_ref()?
            .get(market.key())
            .copied()
            .flatten()
            .and_then(valid_decimal_odds)
    }
}

/// Optional textual reasoning per fixture and market, keyed like [`OddsSnapshot`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReasoningMap(pub HashMap<FixtureId, Option<HashMap<String, Option<String>>>>);

impl ReasoningMap {
    pub fn reasoning(&self, fixture_id: FixtureId, market: Market) -> Option<String> {
        self.0
            .get(&fixture_id)?
            .as_ref()?
            .get(market.key())
            .cloned()
            .flatten()
    }
}

/// Everything the daily run consumes
#[derive(Debug, Clone, Default)]
pub struct OracleInputs {
    pub predictions: Vec<MarketProbabilitySet>,
    pub odds: OddsSnapshot,
    pub reasoning: ReasoningMap,
}

/// The best market for one fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldenBetCandidate {
    pub fixture_id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub league: Option<String>,
    pub kickoff: Option<DateTime<Utc>>,
    pub market: Market,
    pub probability: f64,
    pub odds: Option<f64>,
    pub reasoning: Option<String>,
}

impl GoldenBetCandidate {
    pub fn format(&self) -> String {
        let odds = self
            .odds
            .map(|o| format!("{:.2}", o))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "{} vs {} | {} | Model: {:.1}% | Odds: {}",
            self.home_team,
            self.away_team,
            self.market,
            self.probability * 100.0,
            odds
        )
    }
}

/// A candidate priced longer than the model thinks it should be
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBetCandidate {
    #[serde(flatten)]
    pub bet: GoldenBetCandidate,
    pub edge: f64,
}

impl ValueBetCandidate {
    pub fn format(&self) -> String {
        format!("{} | Edge: {:+.2}%", self.bet.format(), self.edge * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetBuilderLeg {
    pub fixture_id: FixtureId,
    pub home_team: String,
    pub away_team: String,
    pub market: Market,
    pub probability: f64,
    pub odds: Option<f64>,
}

impl From<&GoldenBetCandidate> for BetBuilderLeg {
    fn from(bet: &GoldenBetCandidate) -> Self {
        Self {
            fixture_id: bet.fixture_id,
            home_team: bet.home_team.clone(),
            away_team: bet.away_team.clone(),
            market: bet.market,
            probability: bet.probability,
            odds: bet.odds,
        }
    }
}

/// Multi-leg parlay assembled from the day's strongest picks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetBuilderRecommendation {
    pub legs: Vec<BetBuilderLeg>,
    pub combined_probability: f64,
    pub combined_odds: f64,
}

/// Result of one daily run, written into the cache as a single unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleSnapshot {
    pub date: NaiveDate,
    pub best_markets: Vec<GoldenBetCandidate>,
    pub golden_bets: Vec<GoldenBetCandidate>,
    pub value_bets: Vec<ValueBetCandidate>,
    pub bet_builder: Option<BetBuilderRecommendation>,
}

/// Selection thresholds for the daily run
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub min_odds: f64,
    pub golden_top_n: usize,
    pub min_edge: f64,
    pub value_top_n: usize,
    pub leg_min_probability: f64,
    pub min_legs: usize,
    pub max_legs: usize,
    pub haircut: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            min_odds: 1.6,
            golden_top_n: 3,
            min_edge: 0.05,
            value_top_n: 3,
            leg_min_probability: 0.7,
            min_legs: 3,
            max_legs: 4,
            haircut: 0.75,
        }
    }
}

/// Pick the highest-probability market for a fixture.
/// Ties go to the market encountered first; probabilities outside `[0, 1]`
/// (NaN included) are skipped.
pub fn best_market(
    set: &MarketProbabilitySet,
    odds: &OddsSnapshot,
    reasoning: &ReasoningMap,
) -> Option<GoldenBetCandidate> {
    let mut best: Option<(Market, f64)> = None;
    for market in Market::ALL {
        let probability = set.probability(market);
        if !(0.0..=1.0).contains(&probability) {
            tracing::warn!(
                fixture_id = set.fixture_id,
                market = market.key(),
                probability,
                "Skipping market with probability outside [0, 1]"
            );
            continue;
        }
        if best.map_or(true, |(_, top)| probability > top) {
            best = Some((market, probability));
        }
    }

    let (market, probability) = best?;
    Some(GoldenBetCandidate {
        fixture_id: set.fixture_id,
        home_team: set.home_team.clone(),
        away_team: set.away_team.clone(),
        league: set.league.clone(),
        kickoff: set.kickoff,
        market,
        probability,
        odds: odds.odds(set.fixture_id, market),
        reasoning: reasoning.reasoning(set.fixture_id, market),
    })
}

/// Priced candidates at or above the minimum odds, highest probability first
pub fn select_golden_bets(
    best_markets: &[GoldenBetCandidate],
    config: &OracleConfig,
) -> Vec<GoldenBetCandidate> {
    let mut golden: Vec<GoldenBetCandidate> = best_markets
        .iter()
        .filter(|bet| matches!(bet.odds, Some(odds) if odds >= config.min_odds))
        .cloned()
        .collect();

    golden.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    golden.truncate(config.golden_top_n);
    golden
}

/// Priced candidates whose edge clears the threshold, biggest edge first
pub fn select_value_bets(
    best_markets: &[GoldenBetCandidate],
    config: &OracleConfig,
) -> Vec<ValueBetCandidate> {
    let mut value: Vec<ValueBetCandidate> = best_markets
        .iter()
        .filter_map(|bet| {
            let odds = bet.odds?;
            let edge = calculate_edge(bet.probability, odds);
            (odds >= config.min_odds && edge >= config.min_edge).then(|| ValueBetCandidate {
                bet: bet.clone(),
                edge,
            })
        })
        .collect();

    value.sort_by(|a, b| {
        b.edge
            .partial_cmp(&a.edge)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    value.truncate(config.value_top_n);
    value
}

/// Golden picks then value picks, strong enough to combine, one leg per fixture
pub fn select_bet_builder_legs(
    golden: &[GoldenBetCandidate],
    value: &[ValueBetCandidate],
    config: &OracleConfig,
) -> Vec<BetBuilderLeg> {
    let mut seen = HashSet::new();
    golden
        .iter()
        .chain(value.iter().map(|v| &v.bet))
        .filter(|bet| bet.probability >= config.leg_min_probability)
        .filter(|bet| seen.insert(bet.fixture_id))
        .take(config.max_legs)
        .map(BetBuilderLeg::from)
        .collect()
}

/// A parlay needs at least `min_legs` legs, otherwise there is no recommendation
pub fn build_bet_builder(
    legs: Vec<BetBuilderLeg>,
    config: &OracleConfig,
) -> Option<BetBuilderRecommendation> {
    if legs.len() < config.min_legs {
        return None;
    }

    let combined_probability = combined_probability(legs.iter().map(|leg| leg.probability));
    let combined_odds = combined_odds(legs.iter().map(|leg| leg.odds), config.haircut);

    Some(BetBuilderRecommendation {
        legs,
        combined_probability,
        combined_odds,
    })
}

/// Run the full selection pipeline over already-loaded inputs
pub fn aggregate(inputs: &OracleInputs, date: NaiveDate, config: &OracleConfig) -> OracleSnapshot {
    let best_markets: Vec<GoldenBetCandidate> = inputs
        .predictions
        .iter()
        .filter_map(|set| {
            let best = best_market(set, &inputs.odds, &inputs.reasoning);
            if best.is_none() {
                tracing::warn!(fixture_id = set.fixture_id, "No usable market probabilities");
            }
            best
        })
        .collect();

    let golden_bets = select_golden_bets(&best_markets, config);
    let value_bets = select_value_bets(&best_markets, config);
    let legs = select_bet_builder_legs(&golden_bets, &value_bets, config);
    let bet_builder = build_bet_builder(legs, config);

    OracleSnapshot {
        date,
        best_markets,
        golden_bets,
        value_bets,
        bet_builder,
    }
}

/// Once-a-day job: read the predictor's artifacts, aggregate, publish to the cache
pub struct DailyOracle {
    cache: SharedCache,
    artifacts_dir: PathBuf,
    config: OracleConfig,
}

impl DailyOracle {
    pub fn new(cache: SharedCache, artifacts_dir: impl Into<PathBuf>, config: OracleConfig) -> Self {
        Self {
            cache,
            artifacts_dir: artifacts_dir.into(),
            config,
        }
    }

    /// Aggregate today's artifacts and overwrite the oracle, golden and value slots.
    /// Missing artifacts degrade to an empty snapshot rather than an error.
    pub async fn run(&self) -> OracleSnapshot {
        let inputs = load_oracle_inputs(&self.artifacts_dir).await;
        let snapshot = aggregate(&inputs, Utc::now().date_naive(), &self.config);
        self.publish(&snapshot);

        tracing::info!(
            fixtures = snapshot.best_markets.len(),
            golden = snapshot.golden_bets.len(),
            value = snapshot.value_bets.len(),
            bet_builder = snapshot.bet_builder.is_some(),
            "Daily oracle refreshed"
        );
        snapshot
    }

    /// Manual refresh: drop the derived slots, then recompute immediately
    pub async fn refresh(&self) -> OracleSnapshot {
        self.cache.clear(CacheSlot::GoldenBets);
        self.cache.clear(CacheSlot::ValueBets);
        self.cache.clear(CacheSlot::DailyOracle);
        self.run().await
    }

    fn publish(&self, snapshot: &OracleSnapshot) {
        self.cache
            .set(CachePayload::GoldenBets(snapshot.golden_bets.clone()));
        self.cache
            .set(CachePayload::ValueBets(snapshot.value_bets.clone()));
        self.cache.set(CachePayload::DailyOracle(snapshot.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(fixture_id: FixtureId, probs: [f64; 4]) -> MarketProbabilitySet {
        MarketProbabilitySet {
            fixture_id,
            home_team: format!("Home {}", fixture_id),
            away_team: format!("Away {}", fixture_id),
            league: Some("Premier League".to_string()),
            kickoff: None,
            over25: probs[0],
            btts: probs[1],
            corners: probs[2],
            cards: probs[3],
        }
    }

    fn odds(entries: &[(FixtureId, Market, f64)]) -> OddsSnapshot {
        let mut map: HashMap<FixtureId, Option<HashMap<String, Option<f64>>>> = HashMap::new();
        for (fixture_id, market, price) in entries {
            map.entry(*fixture_id)
                .or_insert_with(|| Some(HashMap::new()))
                .get_or_insert_with(HashMap::new)
                .insert(market.key().to_string(), Some(*price));
        }
        OddsSnapshot(map)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_best_market_with_odds_and_edge() {
        let inputs = OracleInputs {
            predictions: vec![set(1, [0.82, 0.75, 0.60, 0.50])],
            odds: odds(&[(1, Market::Over25Goals, 1.70), (1, Market::BothTeamsToScore, 1.60)]),
            reasoning: ReasoningMap::default(),
        };
        let snapshot = aggregate(&inputs, date(), &OracleConfig::default());

        let best = &snapshot.best_markets[0];
        assert_eq!(best.market, Market::Over25Goals);
        assert_eq!(best.odds, Some(1.70));

        assert_eq!(snapshot.golden_bets.len(), 1);
        assert_eq!(snapshot.value_bets.len(), 1);
        assert!((snapshot.value_bets[0].edge - 0.232).abs() < 0.001);
    }

    #[test]
    fn test_unpriced_best_market_is_listed_but_not_selected() {
        let inputs = OracleInputs {
            predictions: vec![set(2, [0.55, 0.78, 0.40, 0.30])],
            // price exists only for a market that isn't the best one
            odds: odds(&[(2, Market::Over25Goals, 2.10)]),
            reasoning: ReasoningMap::default(),
        };
        let snapshot = aggregate(&inputs, date(), &OracleConfig::default());

        assert_eq!(snapshot.best_markets.len(), 1);
        assert_eq!(snapshot.best_markets[0].market, Market::BothTeamsToScore);
        assert_eq!(snapshot.best_markets[0].odds, None);
        assert!(snapshot.golden_bets.is_empty());
        assert!(snapshot.value_bets.is_empty());
        assert!(snapshot.bet_builder.is_none());
    }

    #[test]
    fn test_tie_goes_to_first_market() {
        let best = best_market(
            &set(3, [0.70, 0.70, 0.70, 0.10]),
            &OddsSnapshot::default(),
            &ReasoningMap::default(),
        )
        .unwrap();
        assert_eq!(best.market, Market::Over25Goals);

        let best = best_market(
            &set(3, [0.20, 0.65, 0.65, 0.10]),
            &OddsSnapshot::default(),
            &ReasoningMap::default(),
        )
        .unwrap();
        assert_eq!(best.market, Market::BothTeamsToScore);
    }

    #[test]
    fn test_reasoning_attached_for_chosen_market() {
        let mut reasoning = HashMap::new();
        reasoning.insert(
            4,
            Some(HashMap::from([
                (
                    "corners".to_string(),
                    Some("Both sides attack down the flanks".to_string()),
                ),
                ("over25".to_string(), Some("Not this one".to_string())),
            ])),
        );
        let best = best_market(
            &set(4, [0.40, 0.30, 0.81, 0.20]),
            &OddsSnapshot::default(),
            &ReasoningMap(reasoning),
        )
        .unwrap();
        assert_eq!(
            best.reasoning.as_deref(),
            Some("Both sides attack down the flanks")
        );
    }

    #[test]
    fn test_golden_and_value_thresholds() {
        let predictions = vec![
            set(1, [0.90, 0.1, 0.1, 0.1]), // odds 1.50: too short
            set(2, [0.60, 0.1, 0.1, 0.1]), // odds 1.65: edge -0.006
            set(3, [0.72, 0.1, 0.1, 0.1]), // odds 1.80: edge 0.164
            set(4, [0.80, 0.1, 0.1, 0.1]), // odds 1.60: edge 0.175
            set(5, [0.66, 0.1, 0.1, 0.1]), // odds 1.70: edge 0.072
            set(6, [0.64, 0.1, 0.1, 0.1]), // odds 2.00: edge 0.14
        ];
        let inputs = OracleInputs {
            predictions,
            odds: odds(&[
                (1, Market::Over25Goals, 1.50),
                (2, Market::Over25Goals, 1.65),
                (3, Market::Over25Goals, 1.80),
                (4, Market::Over25Goals, 1.60),
                (5, Market::Over25Goals, 1.70),
                (6, Market::Over25Goals, 2.00),
            ]),
            reasoning: ReasoningMap::default(),
        };
        let config = OracleConfig::default();
        let snapshot = aggregate(&inputs, date(), &config);

        let golden: Vec<FixtureId> = snapshot.golden_bets.iter().map(|b| b.fixture_id).collect();
        assert_eq!(golden, vec![4, 3, 5]);
        assert!(snapshot
            .golden_bets
            .iter()
            .all(|b| b.odds.unwrap() >= config.min_odds));

        let value: Vec<FixtureId> = snapshot.value_bets.iter().map(|v| v.bet.fixture_id).collect();
        assert_eq!(value, vec![4, 3, 6]);
        assert!(snapshot
            .value_bets
            .iter()
            .all(|v| v.edge >= config.min_edge && v.bet.odds.unwrap() >= config.min_odds));
    }

    #[test]
    fn test_bet_builder_requires_three_legs() {
        let inputs = OracleInputs {
            predictions: vec![
                set(1, [0.82, 0.1, 0.1, 0.1]),
                set(2, [0.75, 0.1, 0.1, 0.1]),
                set(3, [0.62, 0.1, 0.1, 0.1]),
            ],
            odds: odds(&[
                (1, Market::Over25Goals, 1.70),
                (2, Market::Over25Goals, 1.60),
                (3, Market::Over25Goals, 1.90),
            ]),
            reasoning: ReasoningMap::default(),
        };
        let snapshot = aggregate(&inputs, date(), &OracleConfig::default());
        assert_eq!(snapshot.golden_bets.len(), 3);
        assert!(snapshot.bet_builder.is_none());
    }

    #[test]
    fn test_bet_builder_dedupes_fixtures_across_lists() {
        let inputs = OracleInputs {
            predictions: vec![
                set(1, [0.82, 0.1, 0.1, 0.1]),
                set(2, [0.75, 0.1, 0.1, 0.1]),
                set(3, [0.71, 0.1, 0.1, 0.1]),
            ],
            odds: odds(&[
                (1, Market::Over25Goals, 1.70),
                (2, Market::Over25Goals, 1.60),
                (3, Market::Over25Goals, 1.62),
            ]),
            reasoning: ReasoningMap::default(),
        };
        let snapshot = aggregate(&inputs, date(), &OracleConfig::default());

        let builder = snapshot.bet_builder.expect("three distinct legs qualify");
        let legs: Vec<FixtureId> = builder.legs.iter().map(|l| l.fixture_id).collect();
        assert_eq!(legs, vec![1, 2, 3]);
        assert!((builder.combined_probability - 0.82 * 0.75 * 0.71).abs() < 1e-12);
        assert!((builder.combined_odds - 1.70 * 1.60 * 1.62 * 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_bet_builder_caps_legs() {
        let legs: Vec<BetBuilderLeg> = (1..=4)
            .map(|id| BetBuilderLeg {
                fixture_id: id,
                home_team: "H".to_string(),
                away_team: "A".to_string(),
                market: Market::Over25Goals,
                probability: 0.8,
                odds: Some(1.7),
            })
            .collect();
        let golden: Vec<GoldenBetCandidate> = (1..=6)
            .map(|id| GoldenBetCandidate {
                fixture_id: id,
                home_team: "H".to_string(),
                away_team: "A".to_string(),
                league: None,
                kickoff: None,
                market: Market::Over25Goals,
                probability: 0.8,
                odds: Some(1.7),
                reasoning: None,
            })
            .collect();
        let selected = select_bet_builder_legs(&golden, &[], &OracleConfig::default());
        assert_eq!(selected, legs);
    }

    #[test]
    fn test_combined_values_for_known_legs() {
        let legs = [(0.82, 1.70), (0.75, 1.60), (0.71, 1.55)]
            .iter()
            .enumerate()
            .map(|(i, (probability, odds))| BetBuilderLeg {
                fixture_id: i as FixtureId,
                home_team: "H".to_string(),
                away_team: "A".to_string(),
                market: Market::Over25Goals,
                probability: *probability,
                odds: Some(*odds),
            })
            .collect();
        let builder = build_bet_builder(legs, &OracleConfig::default()).unwrap();
        assert!((builder.combined_probability - 0.4366).abs() < 1e-3);
        assert!((builder.combined_odds - 3.162).abs() < 0.01);
    }

    #[test]
    fn test_empty_inputs_give_empty_snapshot() {
        let snapshot = aggregate(&OracleInputs::default(), date(), &OracleConfig::default());
        assert!(snapshot.best_markets.is_empty());
        assert!(snapshot.golden_bets.is_empty());
        assert!(snapshot.value_bets.is_empty());
        assert!(snapshot.bet_builder.is_none());
    }

    #[test]
    fn test_odds_snapshot_parses_string_keys_and_nulls() {
        let json = r#"{ "101": { "over25": 1.85, "btts": null, "cards": 0.5 } }"#;
        let snapshot: OddsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.odds(101, Market::Over25Goals), Some(1.85));
        assert_eq!(snapshot.odds(101, Market::BothTeamsToScore), None);
        // prices below 1.0 are not real decimal odds
        assert_eq!(snapshot.odds(101, Market::CardsOver35), None);
        assert_eq!(snapshot.odds(999, Market::Over25Goals), None);
    }

    #[test]
    fn test_odds_snapshot_ignores_unscored_markets_and_null_fixtures() {
        let json = r#"{
            "1": { "over25": 1.70 },
            "2": { "over25": 1.9, "homeWin": 2.1, "draw": null },
            "3": null
        }"#;
        let snapshot: OddsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.odds(1, Market::Over25Goals), Some(1.70));
        assert_eq!(snapshot.odds(2, Market::Over25Goals), Some(1.9));
        assert_eq!(snapshot.odds(3, Market::Over25Goals), None);
    }

    #[test]
    fn test_out_of_range_probabilities_are_skipped() {
        let best = best_market(
            &set(5, [1.40, 0.72, -0.20, f64::NAN]),
            &OddsSnapshot::default(),
            &ReasoningMap::default(),
        )
        .unwrap();
        assert_eq!(best.market, Market::BothTeamsToScore);
        assert!((best.probability - 0.72).abs() < 1e-12);

        assert!(best_market(
            &set(6, [1.5, 2.0, -1.0, f64::INFINITY]),
            &OddsSnapshot::default(),
            &ReasoningMap::default(),
        )
        .is_none());
    }
}
