//! Error types for research operations

use thiserror::Error;

/// Research pipeline errors
#[derive(Debug, Error)]
pub enum ResearchError {
    /// Ticker symbol failed validation
    #[error("{0}")]
    InvalidTicker(String),

    /// Required data could not be collected
    #[error("Failed to collect data for {ticker}: {reason}")]
    DataCollection { ticker: String, reason: String },

    /// Metric computation failed
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Report or chart output failed
    #[error("Report generation error: {0}")]
    ReportGeneration(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Rate limit exceeded for API
    #[error("Rate limit exceeded for {provider}")]
    RateLimitExceeded { provider: String },

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Alpha Vantage API error
    #[error("Alpha Vantage error: {0}")]
    AlphaVantage(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    Indicator(String),

    /// Template error
    #[error("Template error: {0}")]
    Template(#[from] geyser_template::TemplateError),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResearchError {
    /// Shorthand for a data collection failure
    pub fn collection(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataCollection {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error came from talking to a data provider
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::RateLimitExceeded { .. }
                | Self::YahooFinance(_)
                | Self::AlphaVantage(_)
                | Self::Network(_)
                | Self::DataCollection { .. }
        )
    }
}

/// Result type alias for research operations
pub type Result<T> = std::result::Result<T, ResearchError>;
