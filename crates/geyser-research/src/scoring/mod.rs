//! Weighted multi-factor scoring
//!
//! Six category scorers each produce a 1-10 score with explanation lines.
//! The engine weights them, sums to a total and maps the total onto a
//! recommendation tier. Scoring never fails: missing inputs simply
//! contribute nothing.

mod categories;
mod inputs;
mod weights;

pub use inputs::ScoringInputs;
pub use weights::{CategoryWeights, RecommendationThresholds, ScoringConfig};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Investment recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Recommendation {
    /// First tier whose threshold the score meets, checked from the top
    pub fn from_score(score: f64, thresholds: &RecommendationThresholds) -> Self {
        if score >= thresholds.strong_buy {
            Self::StrongBuy
        } else if score >= thresholds.buy {
            Self::Buy
        } else if score >= thresholds.hold {
            Self::Hold
        } else if score >= thresholds.sell {
            Self::Sell
        } else {
            Self::StrongSell
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
            Self::StrongSell => "Strong Sell",
        }
    }

    pub fn is_buy(&self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six scoring categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Valuation,
    Growth,
    Profitability,
    FinancialHealth,
    MomentumSentiment,
    QualityMoat,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Valuation,
        Self::Growth,
        Self::Profitability,
        Self::FinancialHealth,
        Self::MomentumSentiment,
        Self::QualityMoat,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Valuation => "Valuation",
            Self::Growth => "Growth",
            Self::Profitability => "Profitability",
            Self::FinancialHealth => "Financial Health",
            Self::MomentumSentiment => "Momentum/Sentiment",
            Self::QualityMoat => "Quality/Moat",
        }
    }

    /// Short key used to group factors
    pub fn key(&self) -> &'static str {
        match self {
            Self::Valuation => "valuation",
            Self::Growth => "growth",
            Self::Profitability => "profitability",
            Self::FinancialHealth => "health",
            Self::MomentumSentiment => "momentum",
            Self::QualityMoat => "quality",
        }
    }

    fn weight(&self, weights: &CategoryWeights) -> f64 {
        match self {
            Self::Valuation => weights.valuation,
            Self::Growth => weights.growth,
            Self::Profitability => weights.profitability,
            Self::FinancialHealth => weights.financial_health,
            Self::MomentumSentiment => weights.momentum_sentiment,
            Self::QualityMoat => weights.quality_moat,
        }
    }

    fn scorecard(&self, inputs: &ScoringInputs) -> categories::Scorecard {
        match self {
            Self::Valuation => categories::valuation(inputs),
            Self::Growth => categories::growth(inputs),
            Self::Profitability => categories::profitability(inputs),
            Self::FinancialHealth => categories::financial_health(inputs),
            Self::MomentumSentiment => categories::momentum_sentiment(inputs),
            Self::QualityMoat => categories::quality_moat(inputs),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One category's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// 1-10, one decimal
    pub score: f64,
    pub weight: f64,
    /// score × weight, two decimals
    pub weighted: f64,
    pub factors: Vec<String>,
}

/// Aggregated scoring result for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub ticker: String,
    pub total_score: f64,
    pub recommendation: Recommendation,
    pub categories: Vec<CategoryScore>,
}

impl ScoreReport {
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    /// Factor lists keyed by category in report order
    pub fn all_factors(&self) -> BTreeMap<Category, &[String]> {
        self.categories
            .iter()
            .map(|c| (c.category, c.factors.as_slice()))
            .collect()
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Applies the configured weights and thresholds
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score every category and derive the recommendation
    pub fn score(&self, ticker: &str, inputs: &ScoringInputs) -> ScoreReport {
        let categories: Vec<CategoryScore> = Category::ALL
            .iter()
            .map(|category| {
                let (score, factors) = category.scorecard(inputs).finish();
                let weight = category.weight(&self.config.weights);
                CategoryScore {
                    category: *category,
                    score: round_to(score, 1),
                    weight,
                    weighted: round_to(score * weight, 2),
                    factors,
                }
            })
            .collect();

        let total_score = round_to(categories.iter().map(|c| c.weighted).sum(), 1);
        let recommendation = Recommendation::from_score(total_score, &self.config.thresholds);

        tracing::info!(
            "Scored {}: {}/10 -> {}",
            ticker,
            total_score,
            recommendation
        );
        for c in &categories {
            tracing::debug!(
                "  {}: {} x {} = {} ({} factors)",
                c.category,
                c.score,
                c.weight,
                c.weighted,
                c.factors.len()
            );
        }

        ScoreReport {
            ticker: ticker.to_string(),
            total_score,
            recommendation,
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_thresholds() {
        let t = RecommendationThresholds::default();
        assert_eq!(Recommendation::from_score(8.0, &t), Recommendation::StrongBuy);
        assert_eq!(Recommendation::from_score(6.5, &t), Recommendation::Buy);
        assert_eq!(Recommendation::from_score(5.0, &t), Recommendation::Hold);
        assert_eq!(Recommendation::from_score(3.5, &t), Recommendation::Sell);
        assert_eq!(Recommendation::from_score(3.49, &t), Recommendation::StrongSell);
        assert_eq!(Recommendation::StrongBuy.to_string(), "Strong Buy");
    }

    #[test]
    fn test_neutral_inputs_hold() {
        let report = ScoringEngine::default().score("TEST", &ScoringInputs::default());
        assert_eq!(report.categories.len(), 6);
        assert_eq!(report.total_score, 5.0);
        assert_eq!(report.recommendation, Recommendation::Hold);
        assert!(report.all_factors().values().all(|f| f.is_empty()));
    }

    #[test]
    fn test_total_is_rounded_sum_of_weighted() {
        let inputs = ScoringInputs {
            pe_trailing: Some(60.0),
            revenue_growth: Some(0.18),
            gross_margin: Some(0.45),
            current_ratio: Some(0.9),
            momentum_score: Some(6.3),
            ..Default::default()
        };
        let report = ScoringEngine::default().score("TEST", &inputs);
        let sum: f64 = report.categories.iter().map(|c| c.weighted).sum();
        assert_eq!(report.total_score, round_to(sum, 1));
        for c in &report.categories {
            assert!((1.0..=10.0).contains(&c.score));
        }
        assert_eq!(report.category(Category::Valuation).map(|c| c.score), Some(3.5));
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        let inputs = ScoringInputs {
            pe_trailing: Some(10_000.0),
            peg_ratio: Some(1_000.0),
            revenue_growth: Some(-0.9),
            eps_growth_1y: Some(-5.0),
            gross_margin: Some(0.01),
            operating_margin: Some(-1.0),
            roe: Some(-2.0),
            current_ratio: Some(0.1),
            debt_to_equity: Some(10_000.0),
            momentum_score: Some(1.0),
            analyst_mean_rating: Some(5.0),
            ..Default::default()
        };
        let report = ScoringEngine::default().score("TEST", &inputs);
        assert!(report.categories.iter().all(|c| c.score >= 1.0 && c.score <= 10.0));
        assert_eq!(report.recommendation, Recommendation::StrongSell);
    }

    #[test]
    fn test_strong_buy_profile() {
        let inputs = ScoringInputs {
            pe_trailing: Some(12.0),
            pe_forward: Some(11.0),
            peg_ratio: Some(0.8),
            peer_premium: Some(-25.0),
            fcf_yield: Some(0.07),
            revenue_growth: Some(0.35),
            revenue_cagr_3y: Some(0.25),
            eps_growth_1y: Some(0.30),
            fcf_growth_1y: Some(0.25),
            gross_margin: Some(0.65),
            operating_margin: Some(0.30),
            roe: Some(0.30),
            roic: Some(0.25),
            current_ratio: Some(2.5),
            debt_to_equity: Some(20.0),
            interest_coverage: Some(15.0),
            altman_z_score: Some(4.0),
            momentum_score: Some(7.0),
            ..Default::default()
        };
        let report = ScoringEngine::default().score("GOOD", &inputs);
        let score = |c| report.category(c).map(|s| s.score);
        assert_eq!(score(Category::Valuation), Some(9.0));
        assert_eq!(score(Category::Growth), Some(9.5));
        assert_eq!(score(Category::Profitability), Some(9.5));
        assert_eq!(score(Category::FinancialHealth), Some(8.5));
        assert_eq!(score(Category::MomentumSentiment), Some(7.0));
        assert_eq!(score(Category::QualityMoat), Some(9.0));
        assert_eq!(report.total_score, 8.9);
        assert_eq!(report.recommendation, Recommendation::StrongBuy);
    }

    #[test]
    fn test_six_headline_metrics_alone_reach_buy() {
        // Low P/E, fast revenue growth, wide gross margin, light leverage,
        // firm momentum and a deep peer discount, with nothing else known
        let inputs = ScoringInputs {
            pe_trailing: Some(12.0),
            revenue_growth: Some(0.35),
            gross_margin: Some(0.65),
            debt_to_equity: Some(20.0),
            momentum_score: Some(7.0),
            peer_premium: Some(-25.0),
            ..Default::default()
        };
        let report = ScoringEngine::default().score("LEAN", &inputs);
        let score = |c| report.category(c).map(|s| s.score);
        assert_eq!(score(Category::Valuation), Some(7.5));
        assert_eq!(score(Category::Growth), Some(7.0));
        assert_eq!(score(Category::Profitability), Some(6.5));
        assert_eq!(score(Category::FinancialHealth), Some(6.0));
        assert_eq!(score(Category::MomentumSentiment), Some(7.0));
        assert_eq!(score(Category::QualityMoat), Some(5.5));
        assert_eq!(report.total_score, 6.7);
        assert_eq!(report.recommendation, Recommendation::Buy);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ScoringConfig::new(
            CategoryWeights::default(),
            RecommendationThresholds {
                strong_buy: 9.0,
                buy: 7.0,
                hold: 4.0,
                sell: 2.0,
            },
        )
        .unwrap();
        let report = ScoringEngine::new(config).score("TEST", &ScoringInputs::default());
        assert_eq!(report.recommendation, Recommendation::Hold);
    }
}
