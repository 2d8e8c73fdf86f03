use crate::model::{AnalystCoverage, PriceTargets, RecommendationBreakdown};
use serde::{Deserialize, Serialize};

/// Consensus label for a 1 (strong buy) to 5 (strong sell) mean rating
pub fn consensus_label(mean_rating: f64) -> &'static str {
    if mean_rating <= 1.5 {
        "Strong Buy"
    } else if mean_rating <= 2.5 {
        "Buy"
    } else if mean_rating <= 3.5 {
        "Hold"
    } else if mean_rating <= 4.5 {
        "Sell"
    } else {
        "Strong Sell"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalystSentiment {
    pub has_coverage: bool,
    pub total_analysts: u32,
    pub breakdown: Option<RecommendationBreakdown>,
    pub mean_rating: Option<f64>,
    pub consensus: Option<String>,
    pub price_targets: PriceTargets,
    /// Percent from current price to the mean target
    pub upside_pct: Option<f64>,
}

pub(super) fn analyze(coverage: &AnalystCoverage) -> AnalystSentiment {
    let breakdown = coverage.recommendations.filter(|b| b.total() > 0);
    let mean_rating = breakdown.and_then(|b| b.mean_rating());
    let targets = &coverage.price_targets;

    let upside_pct = match (targets.current_price, targets.target_mean) {
        (Some(current), Some(target)) if current != 0.0 && target != 0.0 => {
            Some((target / current - 1.0) * 100.0)
        }
        _ => None,
    };

    AnalystSentiment {
        has_coverage: breakdown.is_some(),
        total_analysts: breakdown.map_or(0, |b| b.total()),
        breakdown,
        mean_rating,
        consensus: mean_rating.map(|m| consensus_label(m).to_string()),
        price_targets: targets.clone(),
        upside_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consensus_thresholds() {
        assert_eq!(consensus_label(1.5), "Strong Buy");
        assert_eq!(consensus_label(2.0), "Buy");
        assert_eq!(consensus_label(3.5), "Hold");
        assert_eq!(consensus_label(4.0), "Sell");
        assert_eq!(consensus_label(4.6), "Strong Sell");
    }

    #[test]
    fn test_analyze_with_targets() {
        let coverage = AnalystCoverage {
            recommendations: Some(RecommendationBreakdown {
                strong_buy: 10,
                buy: 10,
                ..Default::default()
            }),
            price_targets: PriceTargets {
                current_price: Some(100.0),
                target_mean: Some(125.0),
                ..Default::default()
            },
        };
        let result = analyze(&coverage);
        assert!(result.has_coverage);
        assert_eq!(result.total_analysts, 20);
        assert_eq!(result.mean_rating, Some(1.5));
        assert_eq!(result.consensus.as_deref(), Some("Strong Buy"));
        assert_eq!(result.upside_pct, Some(25.0));
    }

    #[test]
    fn test_no_coverage() {
        let result = analyze(&AnalystCoverage::default());
        assert!(!result.has_coverage);
        assert_eq!(result.mean_rating, None);
        assert_eq!(result.upside_pct, None);
    }
}
