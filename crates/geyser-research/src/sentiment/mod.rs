//! Analyst, earnings, insider and momentum sentiment
//!
//! Each sub-analysis is independent and tolerant of missing data. The
//! summary blends whichever sub-scores are present into one 1-10 reading.

mod analyst;
mod earnings;
mod insider;
mod momentum;

pub use analyst::{AnalystSentiment, consensus_label};
pub use earnings::{EarningsOutcome, EarningsSentiment, QuarterResult, surprise_pct};
pub use insider::InsiderSentiment;
pub use momentum::{MomentumSentiment, PriceMomentum};

use crate::collector::CompanyData;
use serde::{Deserialize, Serialize};

const ANALYST_WEIGHT: f64 = 0.30;
const EARNINGS_WEIGHT: f64 = 0.25;
const MOMENTUM_WEIGHT: f64 = 0.25;
const INSIDER_WEIGHT: f64 = 0.10;
const UPSIDE_WEIGHT: f64 = 0.10;

/// Institutional and insider holdings as fractions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipSummary {
    pub institutional_ownership_pct: Option<f64>,
    pub insider_ownership_pct: Option<f64>,
}

/// One input to the overall sentiment score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentComponent {
    pub name: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub ticker: String,
    pub analyst: AnalystSentiment,
    pub earnings: EarningsSentiment,
    pub insider: InsiderSentiment,
    pub ownership: OwnershipSummary,
    pub momentum: MomentumSentiment,
    pub score_components: Vec<SentimentComponent>,
    /// 1-10, one decimal
    pub overall_score: f64,
    pub overall_label: String,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Map a 1-5 mean rating onto 1-10, 1.0 scoring highest
fn analyst_score(mean_rating: f64) -> f64 {
    10.0 - (mean_rating - 1.0) * 2.25
}

fn earnings_score(beat_rate: f64, avg_surprise_pct: Option<f64>) -> f64 {
    let mut score = 5.0 + beat_rate * 5.0;
    if avg_surprise_pct.unwrap_or(0.0) > 5.0 {
        score += 1.0;
    }
    score.min(10.0)
}

fn upside_score(upside_pct: f64) -> f64 {
    if upside_pct > 30.0 {
        9.0
    } else if upside_pct > 15.0 {
        7.0
    } else if upside_pct > 0.0 {
        6.0
    } else if upside_pct > -15.0 {
        4.0
    } else {
        2.0
    }
}

fn overall_label(score: f64) -> &'static str {
    if score >= 7.5 {
        "Very Bullish"
    } else if score >= 6.0 {
        "Bullish"
    } else if score >= 4.5 {
        "Neutral"
    } else if score >= 3.0 {
        "Bearish"
    } else {
        "Very Bearish"
    }
}

impl SentimentSummary {
    /// Analyze every sentiment source for the collected data
    pub fn analyze(data: &CompanyData) -> Self {
        tracing::info!("Analyzing sentiment for {}", data.ticker);

        let analyst = analyst::analyze(&data.analyst);
        let earnings = earnings::analyze(&data.earnings);
        let insider = insider::analyze(&data.insiders);
        let momentum = momentum::analyze(&data.overview, &data.returns, &data.technicals);
        let ownership = OwnershipSummary {
            institutional_ownership_pct: data.statistics.institutional_ownership,
            insider_ownership_pct: data.statistics.insider_ownership,
        };

        let mut components = Vec::new();
        let mut push = |name: &str, score: f64, weight: f64| {
            components.push(SentimentComponent {
                name: name.to_string(),
                score,
                weight,
            });
        };
        if let Some(mean) = analyst.mean_rating {
            push("analyst", analyst_score(mean), ANALYST_WEIGHT);
        }
        if let Some(rate) = earnings.beat_rate {
            push(
                "earnings",
                earnings_score(rate, earnings.avg_surprise_pct),
                EARNINGS_WEIGHT,
            );
        }
        push("momentum", momentum.momentum_score, MOMENTUM_WEIGHT);
        if let Some(score) = insider.score() {
            push("insider", score, INSIDER_WEIGHT);
        }
        if let Some(upside) = analyst.upside_pct {
            push("upside", upside_score(upside), UPSIDE_WEIGHT);
        }

        let total_weight: f64 = components.iter().map(|c| c.weight).sum();
        let (overall_score, overall_label) = if total_weight > 0.0 {
            let weighted: f64 = components.iter().map(|c| c.score * c.weight).sum();
            let score = round1(weighted / total_weight);
            (score, overall_label(score).to_string())
        } else {
            (5.0, "Neutral (Limited Data)".to_string())
        };

        tracing::debug!(
            "Sentiment for {}: {} ({}) from {} components",
            data.ticker,
            overall_score,
            overall_label,
            components.len()
        );

        Self {
            ticker: data.ticker.clone(),
            analyst,
            earnings,
            insider,
            ownership,
            momentum,
            score_components: components,
            overall_score,
            overall_label,
        }
    }

    pub fn component(&self, name: &str) -> Option<&SentimentComponent> {
        self.score_components.iter().find(|c| c.name == name)
    }
}
