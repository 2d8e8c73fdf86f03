use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Analyst rating counts for the latest period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBreakdown {
    pub strong_buy: u32,
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
    pub strong_sell: u32,
}

impl RecommendationBreakdown {
    pub fn total(&self) -> u32 {
        self.strong_buy + self.buy + self.hold + self.sell + self.strong_sell
    }

    /// Weighted mean on a 1 (strong buy) to 5 (strong sell) scale
    pub fn mean_rating(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted = self.strong_buy + self.buy * 2 + self.hold * 3 + self.sell * 4
            + self.strong_sell * 5;
        Some(f64::from(weighted) / f64::from(total))
    }

    /// Label and count pairs in display order
    pub fn entries(&self) -> [(&'static str, u32); 5] {
        [
            ("Strong Buy", self.strong_buy),
            ("Buy", self.buy),
            ("Hold", self.hold),
            ("Sell", self.sell),
            ("Strong Sell", self.strong_sell),
        ]
    }
}

/// Consensus price targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTargets {
    pub current_price: Option<f64>,
    pub target_mean: Option<f64>,
    pub target_low: Option<f64>,
    pub target_high: Option<f64>,
    pub target_median: Option<f64>,
    pub analyst_count: Option<u32>,
}

/// Analyst ratings and targets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalystCoverage {
    pub recommendations: Option<RecommendationBreakdown>,
    pub price_targets: PriceTargets,
}

/// Reported versus estimated EPS for one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsSurprise {
    pub period_end: Option<NaiveDate>,
    pub reported_eps: Option<f64>,
    pub estimated_eps: Option<f64>,
}

/// Direction of an insider trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Buy,
    Sell,
    Other,
}

impl TransactionKind {
    /// Classify free-form transaction text ("Purchase at price...", "Sale", "Gift")
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("buy") || lower.contains("purchase") {
            Self::Buy
        } else if lower.contains("sell") || lower.contains("sale") {
            Self::Sell
        } else {
            Self::Other
        }
    }
}

/// One insider filing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsiderTransaction {
    pub date: Option<NaiveDate>,
    pub insider: String,
    pub position: Option<String>,
    /// Provider's description of the transaction
    pub text: String,
    pub shares: Option<f64>,
    pub value: Option<f64>,
}

impl InsiderTransaction {
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::from_text(&self.text)
    }
}
