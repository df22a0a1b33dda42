/// Convert decimal odds to the bookmaker-implied probability
/// Decimal odds of 2.0 pay back twice the stake, so they imply a 50% chance
pub fn decimal_odds_to_probability(odds: f64) -> f64 {
    1.0 / odds
}

/// Edge of a model probability over the bookmaker's implied probability
pub fn calculate_edge(model_prob: f64, odds: f64) -> f64 {
    model_prob - decimal_odds_to_probability(odds)
}

/// Decimal odds are only usable when finite and at least 1.0
pub fn valid_decimal_odds(odds: f64) -> Option<f64> {
    if odds.is_finite() && odds >= 1.0 {
        Some(odds)
    } else {
        None
    }
}

/// Probability that every leg of a parlay lands, assuming independent legs
pub fn combined_probability<I>(probabilities: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    probabilities.into_iter().product()
}

/// Combined parlay odds: product of leg odds, a missing price counting as 1.0,
/// then discounted by `haircut` to approximate the bookmaker's margin on combos
pub fn combined_odds<I>(odds: I, haircut: f64) -> f64
where
    I: IntoIterator<Item = Option<f64>>,
{
    odds.into_iter().map(|o| o.unwrap_or(1.0)).product::<f64>() * haircut
}
