//! Input validation and data-quality checks

use crate::collector::CompanyData;
use crate::error::{ResearchError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// 1-5 letters, optionally followed by a 1-3 letter exchange suffix
static TICKER_PATTERN: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{1,5}(\.[A-Z]{1,3})?$"));

/// Fewer price bars than this triggers a warning
const MIN_PRICE_BARS: usize = 30;

/// Trim, upper-case and validate a ticker symbol
///
/// ```
/// use geyser_research::validation::sanitize_ticker;
///
/// assert_eq!(sanitize_ticker(" brk.b ").unwrap(), "BRK.B");
/// assert!(sanitize_ticker("TOOLONG").is_err());
/// ```
pub fn sanitize_ticker(ticker: &str) -> Result<String> {
    let normalized = ticker.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(ResearchError::InvalidTicker(
            "Ticker must be a non-empty string".to_string(),
        ));
    }

    let pattern = TICKER_PATTERN
        .as_ref()
        .map_err(|e| ResearchError::Validation(e.to_string()))?;
    if !pattern.is_match(&normalized) {
        return Err(ResearchError::InvalidTicker(format!(
            "Invalid ticker format: {normalized}. \
             Expected format: 1-5 letters, optionally followed by .XX for exchange"
        )));
    }

    Ok(normalized)
}

/// Whether a ticker is well formed after normalisation
pub fn is_valid_ticker(ticker: &str) -> bool {
    sanitize_ticker(ticker).is_ok()
}

/// Collect data-quality warnings; never fails
pub fn validate_financial_data(data: &CompanyData) -> Vec<String> {
    let mut warnings = Vec::new();

    if data.overview.market_cap.is_some_and(|m| m <= 0.0) {
        warnings.push("Invalid or missing market cap".to_string());
    }
    if data.overview.current_price.is_some_and(|p| p <= 0.0) {
        warnings.push("Invalid or missing current price".to_string());
    }
    if data.statements.income.is_empty() {
        warnings.push("Empty income statement data".to_string());
    }
    if data.statements.balance.is_empty() {
        warnings.push("Empty balance sheet data".to_string());
    }
    if data.statements.cash_flow.is_empty() {
        warnings.push("Empty cash flow data".to_string());
    }
    if data.prices.is_empty() {
        warnings.push("No historical price data available".to_string());
    } else if data.prices.len() < MIN_PRICE_BARS {
        warnings.push("Limited historical price data (< 30 days)".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceBar;
    use chrono::NaiveDate;

    #[test]
    fn test_sanitize_ticker() {
        assert_eq!(sanitize_ticker("nvda").unwrap(), "NVDA");
        assert_eq!(sanitize_ticker("  aapl\n").unwrap(), "AAPL");
        assert_eq!(sanitize_ticker("RY.TO").unwrap(), "RY.TO");
        assert!(is_valid_ticker("A"));
    }

    #[test]
    fn test_rejects_malformed_tickers() {
        for bad in ["ABCDEF", "NV1DA", "BRK.", "BRK.ABCD", "BR-K", "."] {
            let err = sanitize_ticker(bad).unwrap_err();
            assert!(
                err.to_string().starts_with("Invalid ticker format:"),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn test_rejects_empty_ticker() {
        let err = sanitize_ticker("   ").unwrap_err();
        assert_eq!(err.to_string(), "Ticker must be a non-empty string");
    }

    #[test]
    fn test_financial_data_warnings() {
        let mut data = CompanyData::empty("NVDA");
        data.overview.market_cap = Some(0.0);
        data.overview.current_price = Some(-1.0);

        let warnings = validate_financial_data(&data);
        assert_eq!(
            warnings,
            vec![
                "Invalid or missing market cap",
                "Invalid or missing current price",
                "Empty income statement data",
                "Empty balance sheet data",
                "Empty cash flow data",
                "No historical price data available",
            ]
        );
    }

    #[test]
    fn test_limited_price_history_warning() {
        let mut data = CompanyData::empty("NVDA");
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        data.prices = (0..10)
            .map(|i| PriceBar {
                date: start + chrono::Duration::days(i),
                open: 1.0,
                high: 1.0,
                low: 1.0,
                close: 1.0,
                volume: 100,
            })
            .collect();

        let warnings = validate_financial_data(&data);
        assert!(warnings.contains(&"Limited historical price data (< 30 days)".to_string()));
        assert!(!warnings.iter().any(|w| w.contains("market cap")));
    }
}
