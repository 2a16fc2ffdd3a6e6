//! Market snapshot HTTP handlers

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::market::StockListResponse;
use crate::state::AppState;

/// GET /api/stocks/top10 - Snapshot of the tracked large-cap tickers
pub async fn top10(State(state): State<AppState>) -> Result<Json<StockListResponse>, ApiError> {
    let stocks = state
        .market_service
        .top10_snapshot()
        .await
        .map_err(|e| ApiError::ExternalServiceError(e.to_string()))?;

    Ok(Json(StockListResponse {
        count: stocks.len(),
        stocks,
    }))
}
