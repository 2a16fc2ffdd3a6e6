//! Market data models

use serde::{Deserialize, Serialize};

/// Snapshot of a single ticker
#[derive(Debug, Serialize, Clone)]
pub struct StockQuote {
    pub ticker: String,
    pub name: String,
    pub current_price: i64,
    /// Change vs. previous close, absolute
    pub change: i64,
    /// Change vs. previous close, percent (two decimals)
    pub change_rate: f64,
    pub volume: i64,
}

/// Snapshot list response
#[derive(Debug, Serialize)]
pub struct StockListResponse {
    pub stocks: Vec<StockQuote>,
    pub count: usize,
}

/// Daily candle as served by the quote source
#[derive(Debug, Deserialize)]
pub struct DailyQuote {
    pub name: String,
    pub close: i64,
    /// Absent on a ticker's first trading day
    pub prev_close: Option<i64>,
    pub volume: i64,
}
