use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use histock_core::{MarketSymbol, PriceRecord};
use histock_service::LoadOutcome;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/v1/market/{name}", get(market_series))
        .route("/api/v1/load-data", get(load_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    ""
}

/// Returns the full stored series for one market, oldest row first.
async fn market_series(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<PriceRecord>>, ApiError> {
    let market = MarketSymbol::parse(&name)?;

    // The store read is synchronous duckdb work; keep it off the runtime.
    let query = state.query.clone();
    let lookup = market.clone();
    let series = tokio::task::spawn_blocking(move || query.market_series(&lookup))
        .await
        .map_err(|e| ApiError::Internal(format!("query task failed: {e}")))?
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    match series {
        Some(records) => Ok(Json(records)),
        None => Err(ApiError::NotLoaded {
            market: market.to_string(),
        }),
    }
}

/// Runs one ingestion pass over the configured watchlist.
async fn load_data(State(state): State<AppState>) -> Result<Json<&'static str>, ApiError> {
    let _guard = state
        .ingest_lock
        .try_lock()
        .map_err(|_| ApiError::IngestBusy)?;

    let outcome = state.pipeline.load_all(&state.markets, &state.shutdown).await?;
    match outcome {
        LoadOutcome::Loaded { .. } => Ok(Json("OK")),
        LoadOutcome::AlreadyLoaded => Ok(Json("DATA IS LOADED ALREADY")),
    }
}
