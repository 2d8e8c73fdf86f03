//! Yahoo Finance price history client

use crate::error::{ResearchError, Result};
use crate::model::PriceBar;
use chrono::{DateTime, Duration, Utc};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// Days per calendar year when converting a lookback to a date range
const DAYS_PER_YEAR: i64 = 365;

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    pub fn new() -> Self {
        Self {}
    }

    /// Daily bars for the last `years`, oldest first
    pub async fn price_history(&self, symbol: &str, years: u32) -> Result<Vec<PriceBar>> {
        let end = Utc::now();
        let start = end - Duration::days(DAYS_PER_YEAR * i64::from(years));
        self.historical_bars(symbol, start, end).await
    }

    /// Daily bars between two instants
    pub async fn historical_bars(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| ResearchError::YahooFinance(e.to_string()))?;

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ResearchError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ResearchError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

        tracing::debug!("Fetching Yahoo price history for {}", symbol);
        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| ResearchError::YahooFinance(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| ResearchError::YahooFinance(e.to_string()))?;

        let mut bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
                Some(PriceBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .filter(|bar| bar.close.is_finite() && bar.close > 0.0)
            .collect();
        bars.sort_by_key(|bar| bar.date);
        bars.dedup_by_key(|bar| bar.date);

        tracing::info!("Fetched {} price bars for {}", bars.len(), symbol);
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_price_history() {
        let client = YahooFinanceClient::new();
        let bars = client.price_history("AAPL", 1).await.unwrap();
        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }
}
