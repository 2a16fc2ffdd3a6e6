//! Market data snapshot for the dashboard
//!
//! Thin pass-through over the external quote source: fetch daily candles for
//! the tracked large-cap tickers and report price, change vs. previous close,
//! and volume.

mod model;
mod service;

pub use model::{StockListResponse, StockQuote};
pub use service::{MarketDataService, TRACKED_TICKERS};
