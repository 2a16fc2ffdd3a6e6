//! Market snapshot routes

use axum::{routing::get, Router};

use crate::handlers::stocks;
use crate::state::AppState;

/// Create market snapshot routes
pub fn stock_routes() -> Router<AppState> {
    Router::new().route("/api/stocks/top10", get(stocks::top10))
}
