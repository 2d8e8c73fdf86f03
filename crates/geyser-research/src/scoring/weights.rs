//! Category weights and recommendation thresholds

use crate::error::{ResearchError, Result};
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Relative importance of each scoring category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub valuation: f64,
    pub growth: f64,
    pub profitability: f64,
    pub financial_health: f64,
    pub momentum_sentiment: f64,
    pub quality_moat: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            valuation: 0.25,
            growth: 0.20,
            profitability: 0.20,
            financial_health: 0.15,
            momentum_sentiment: 0.10,
            quality_moat: 0.10,
        }
    }
}

impl CategoryWeights {
    fn entries(&self) -> [(&'static str, f64); 6] {
        [
            ("valuation", self.valuation),
            ("growth", self.growth),
            ("profitability", self.profitability),
            ("financial_health", self.financial_health),
            ("momentum_sentiment", self.momentum_sentiment),
            ("quality_moat", self.quality_moat),
        ]
    }

    /// Sum of all six weights
    pub fn total(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }
}

/// Minimum total score for each recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationThresholds {
    pub strong_buy: f64,
    pub buy: f64,
    pub hold: f64,
    pub sell: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            strong_buy: 8.0,
            buy: 6.5,
            hold: 5.0,
            sell: 3.5,
        }
    }
}

/// Weights and thresholds consumed by the scoring engine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: CategoryWeights,
    pub thresholds: RecommendationThresholds,
}

impl ScoringConfig {
    /// Construct and validate
    pub fn new(weights: CategoryWeights, thresholds: RecommendationThresholds) -> Result<Self> {
        let config = Self {
            weights,
            thresholds,
        };
        config.validate()?;
        Ok(config)
    }

    /// Weights must lie in [0, 1] and sum to 1; thresholds must strictly descend
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in self.weights.entries() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(ResearchError::Config(format!(
                    "weight '{name}' must be between 0 and 1, got {weight}"
                )));
            }
        }

        let total = self.weights.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ResearchError::Config(format!(
                "category weights must sum to 1.0, got {total}"
            )));
        }

        let t = &self.thresholds;
        if !(t.strong_buy > t.buy && t.buy > t.hold && t.hold > t.sell) {
            return Err(ResearchError::Config(format!(
                "recommendation thresholds must strictly descend (strong_buy {} > buy {} > hold {} > sell {})",
                t.strong_buy, t.buy, t.hold, t.sell
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let config = ScoringConfig::default();
        assert!((config.weights.total() - 1.0).abs() < WEIGHT_TOLERANCE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_weights_not_summing_to_one() {
        let weights = CategoryWeights {
            valuation: 0.5,
            ..Default::default()
        };
        let err = ScoringConfig::new(weights, RecommendationThresholds::default()).unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let weights = CategoryWeights {
            valuation: 1.25,
            growth: -0.25,
            ..Default::default()
        };
        assert!(ScoringConfig::new(weights, RecommendationThresholds::default()).is_err());
    }

    #[test]
    fn test_rejects_non_descending_thresholds() {
        let thresholds = RecommendationThresholds {
            buy: 8.0,
            ..Default::default()
        };
        let err = ScoringConfig::new(CategoryWeights::default(), thresholds).unwrap_err();
        assert!(matches!(err, ResearchError::Config(_)));
    }

    #[test]
    fn test_partial_toml() {
        let config: ScoringConfig = toml::from_str(
            "[thresholds]\nstrong_buy = 8.5\n",
        )
        .unwrap();
        assert_eq!(config.thresholds.strong_buy, 8.5);
        assert_eq!(config.thresholds.buy, 6.5);
        assert_eq!(config.weights, CategoryWeights::default());
    }
}
