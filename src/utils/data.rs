use crate::utils::oracle::{
    GoldenBetCandidate, MarketProbabilitySet, OddsSnapshot, OracleInputs, ReasoningMap,
    ValueBetCandidate,
};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub const PREDICTIONS_FILE: &str = "predictions.json";
pub const ODDS_FILE: &str = "odds.json";
pub const REASONING_FILE: &str = "reasoning.json";

/// Load a JSON artifact
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to deserialize {}", path.display()))?;
    Ok(value)
}

/// Load a JSON artifact, falling back to the empty value when missing or unreadable
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    if !path.exists() {
        tracing::info!(path = %path.display(), "Artifact not present, using empty default");
        return T::default();
    }

    match load_json(path).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %format!("{:#}", e), "Unreadable artifact, using empty default");
            T::default()
        }
    }
}

/// Read the predictor's daily artifacts from `dir`. Never fails.
pub async fn load_oracle_inputs(dir: &Path) -> OracleInputs {
    let predictions: Vec<MarketProbabilitySet> =
        load_json_or_default(&dir.join(PREDICTIONS_FILE)).await;
    let odds: OddsSnapshot = load_json_or_default(&dir.join(ODDS_FILE)).await;
    let reasoning: ReasoningMap = load_json_or_default(&dir.join(REASONING_FILE)).await;

    OracleInputs {
        predictions,
        odds,
        reasoning,
    }
}

/// Write a JSON artifact, creating parent directories as needed
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create artifact directory")?;
    }
    let json = serde_json::to_string_pretty(value).context("Failed to serialize artifact")?;
    std::fs::write(path, json).context("Failed to write artifact")?;
    Ok(())
}

#[derive(Serialize)]
struct BetRow<'a> {
    #[serde(rename = "Fixture")]
    fixture_id: u64,
    #[serde(rename = "Home Team")]
    home_team: &'a str,
    #[serde(rename = "Away Team")]
    away_team: &'a str,
    #[serde(rename = "Market")]
    market: &'static str,
    #[serde(rename = "Model Probability (%)")]
    probability: String,
    #[serde(rename = "Odds")]
    odds: String,
    #[serde(rename = "Edge (%)")]
    edge: String,
}

impl<'a> BetRow<'a> {
    fn new(bet: &'a GoldenBetCandidate, edge: Option<f64>) -> Self {
        Self {
            fixture_id: bet.fixture_id,
            home_team: &bet.home_team,
            away_team: &bet.away_team,
            market: bet.market.label(),
            probability: format!("{:.1}", bet.probability * 100.0),
            odds: bet.odds.map(|o| format!("{:.2}", o)).unwrap_or_default(),
            edge: edge.map(|e| format!("{:.2}", e * 100.0)).unwrap_or_default(),
        }
    }
}

/// Save golden bets to CSV
pub fn save_golden_bets_to_csv(bets: &[GoldenBetCandidate], filename: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;
    for bet in bets {
        writer.serialize(BetRow::new(bet, None))?;
    }
    writer.flush()?;
    Ok(())
}

/// Save value bets to CSV
pub fn save_value_bets_to_csv(bets: &[ValueBetCandidate], filename: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;
    for bet in bets {
        writer.serialize(BetRow::new(&bet.bet, Some(bet.edge)))?;
    }
    writer.flush()?;
    Ok(())
}
