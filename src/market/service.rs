//! Quote fetching service

use anyhow::{Context, Result};

use super::model::{DailyQuote, StockQuote};

/// KOSPI large-cap tickers tracked by the dashboard
pub const TRACKED_TICKERS: [&str; 10] = [
    "005930", // Samsung Electronics
    "000660", // SK hynix
    "373220", // LG Energy Solution
    "207940", // Samsung Biologics
    "005380", // Hyundai Motor
    "000270", // Kia
    "068270", // Celltrion
    "105560", // KB Financial
    "055550", // Shinhan Financial
    "005490", // POSCO Holdings
];

/// Fetches daily quotes from the configured source
pub struct MarketDataService {
    http: reqwest::Client,
    base_url: String,
}

impl MarketDataService {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Snapshot of all tracked tickers.
    ///
    /// Tickers the source cannot answer for are skipped with a warning; the
    /// call fails only when nothing at all could be fetched.
    pub async fn top10_snapshot(&self) -> Result<Vec<StockQuote>> {
        let mut quotes = Vec::with_capacity(TRACKED_TICKERS.len());

        for ticker in TRACKED_TICKERS {
            match self.fetch_quote(ticker).await {
                Ok(quote) => quotes.push(quote),
                Err(e) => {
                    tracing::warn!(ticker, error = %e, "skipping ticker");
                }
            }
        }

        if quotes.is_empty() {
            anyhow::bail!("quote source returned no data for any tracked ticker");
        }

        Ok(quotes)
    }

    async fn fetch_quote(&self, ticker: &str) -> Result<StockQuote> {
        let url = format!("{}/daily/{}", self.base_url.trim_end_matches('/'), ticker);

        let daily: DailyQuote = self
            .http
            .get(&url)
            .send()
            .await
            .context("quote request failed")?
            .error_for_status()
            .context("quote source answered with an error status")?
            .json()
            .await
            .context("quote payload could not be decoded")?;

        Ok(build_quote(ticker, daily))
    }
}

/// Derive change and change rate from a daily candle.
fn build_quote(ticker: &str, daily: DailyQuote) -> StockQuote {
    let (change, change_rate) = match daily.prev_close {
        Some(prev) if prev > 0 => {
            let change = daily.close - prev;
            let rate = (change as f64 / prev as f64 * 100.0 * 100.0).round() / 100.0;
            (change, rate)
        }
        _ => (0, 0.0),
    };

    StockQuote {
        ticker: ticker.to_string(),
        name: daily.name,
        current_price: daily.close,
        change,
        change_rate,
        volume: daily.volume,
    }
}
