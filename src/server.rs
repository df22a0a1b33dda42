use crate::cache::{CacheSlot, SharedCache, SlotStatus};
use crate::utils::oracle::DailyOracle;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state for the read surface
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
    pub oracle: Arc<DailyOracle>,
}

#[derive(Serialize)]
struct SlotReport {
    slot: CacheSlot,
    #[serde(flatten)]
    status: SlotStatus,
}

fn not_available(slot: CacheSlot) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "message": format!("{} not available yet", slot) })),
    )
        .into_response()
}

async fn golden_bets(State(state): State<AppState>) -> Response {
    match state.cache.golden_bets() {
        Some(bets) => Json(bets).into_response(),
        None => not_available(CacheSlot::GoldenBets),
    }
}

async fn value_bets(State(state): State<AppState>) -> Response {
    match state.cache.value_bets() {
        Some(bets) => Json(bets).into_response(),
        None => not_available(CacheSlot::ValueBets),
    }
}

async fn daily_oracle(State(state): State<AppState>) -> Response {
    match state.cache.daily_oracle() {
        Some(snapshot) => Json(snapshot).into_response(),
        None => not_available(CacheSlot::DailyOracle),
    }
}

async fn cache_status(State(state): State<AppState>) -> impl IntoResponse {
    let report: Vec<SlotReport> = state
        .cache
        .status_all()
        .into_iter()
        .map(|(slot, status)| SlotReport { slot, status })
        .collect();
    Json(report)
}

async fn refresh_oracle(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.oracle.refresh().await)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/golden-bets", get(golden_bets))
        .route("/api/value-bets", get(value_bets))
        .route("/api/oracle", get(daily_oracle))
        .route("/api/oracle/refresh", post(refresh_oracle))
        .route("/api/cache/status", get(cache_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
