//! Bull and bear case synthesis
//!
//! Scoring factors are sorted into bull and bear lists by a keyword table,
//! then a few observations derived directly from the metrics are appended.

use crate::analysis::FinancialAnalysis;
use crate::peers::PeerSummary;
use crate::scoring::ScoreReport;
use crate::sentiment::SentimentSummary;
use serde::{Deserialize, Serialize};

const MAX_POINTS: usize = 5;
const MAX_MONITORS: usize = 7;

/// Which side of the thesis a factor supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Bull,
    Bear,
    Neutral,
}

const BULL_KEYWORDS: &[&str] = &[
    "strong",
    "excellent",
    "high",
    "good",
    "healthy",
    "low p/e",
    "attractive",
    "growth",
    "beat",
    "bullish",
    "upside",
    "above",
];

const BEAR_KEYWORDS: &[&str] = &[
    "low",
    "weak",
    "declining",
    "high p/e",
    "elevated",
    "risk",
    "bearish",
    "below",
    "miss",
    "thin",
    "concern",
];

/// Keyword to polarity table, evaluated in priority order
///
/// The first table containing a matching keyword decides. Bull is checked
/// before bear, so "Weak earnings beat rate" is bull on "beat".
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    tables: Vec<(Polarity, Vec<String>)>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(vec![
            (Polarity::Bull, BULL_KEYWORDS),
            (Polarity::Bear, BEAR_KEYWORDS),
        ])
    }
}

impl KeywordClassifier {
    pub fn new(tables: Vec<(Polarity, &[&str])>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|(p, words)| (p, words.iter().map(|w| w.to_lowercase()).collect()))
                .collect(),
        }
    }

    pub fn classify(&self, factor: &str) -> Polarity {
        let lower = factor.to_lowercase();
        self.tables
            .iter()
            .find(|(_, words)| words.iter().any(|w| lower.contains(w.as_str())))
            .map_or(Polarity::Neutral, |(polarity, _)| *polarity)
    }
}

/// Bull case, bear case and the metrics worth watching
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentThesis {
    pub bull_case: Vec<String>,
    pub bear_case: Vec<String>,
    pub monitors: Vec<String>,
}

fn push_unique(points: &mut Vec<String>, point: String) {
    if !points.contains(&point) {
        points.push(point);
    }
}

fn mentions(points: &[String], needle: &str) -> bool {
    points.iter().any(|p| p.to_lowercase().contains(needle))
}

/// Composes the thesis from upstream stage results
pub struct ThesisComposer<'a> {
    pub analysis: &'a FinancialAnalysis,
    pub scores: &'a ScoreReport,
    pub peers: Option<&'a PeerSummary>,
    pub sentiment: Option<&'a SentimentSummary>,
    /// Industry name, used for sector-specific monitors
    pub industry: Option<&'a str>,
}

impl ThesisComposer<'_> {
    pub fn compose(&self) -> InvestmentThesis {
        let classifier = KeywordClassifier::default();
        let mut bull = Vec::new();
        let mut bear = Vec::new();

        for category in &self.scores.categories {
            for factor in &category.factors {
                match classifier.classify(factor) {
                    Polarity::Bull => push_unique(&mut bull, factor.clone()),
                    Polarity::Bear => push_unique(&mut bear, factor.clone()),
                    Polarity::Neutral => {}
                }
            }
        }
        bull.truncate(MAX_POINTS);
        bear.truncate(MAX_POINTS);

        self.add_bull_observations(&mut bull);
        self.add_bear_observations(&mut bear);

        InvestmentThesis {
            bull_case: bull,
            bear_case: bear,
            monitors: self.monitors(),
        }
    }

    fn premium(&self) -> f64 {
        self.peers.map_or(0.0, PeerSummary::avg_premium)
    }

    fn upside(&self) -> f64 {
        self.sentiment
            .and_then(|s| s.analyst.upside_pct)
            .unwrap_or(0.0)
    }

    fn add_bull_observations(&self, bull: &mut Vec<String>) {
        let growth = &self.analysis.growth;

        let revenue_1y = growth.revenue_growth_1y.unwrap_or(0.0);
        if revenue_1y > 0.15 && !mentions(bull, "revenue growth") {
            push_unique(
                bull,
                format!("Revenue growing at {:.1}% YoY", revenue_1y * 100.0),
            );
        }

        if self.analysis.profitability.margin_trends.operating_margin_expanding() {
            push_unique(bull, "Operating margins expanding year-over-year".to_string());
        }

        if self.premium() < -15.0 {
            push_unique(
                bull,
                "Trading at discount to peers despite comparable fundamentals".to_string(),
            );
        }

        let upside = self.upside();
        if upside > 15.0 {
            push_unique(
                bull,
                format!("Analyst consensus implies {upside:.0}% upside potential"),
            );
        }
    }

    fn add_bear_observations(&self, bear: &mut Vec<String>) {
        if let Some(pe) = self.analysis.valuation.pe_trailing {
            if pe > 35.0 && !mentions(bear, "p/e") {
                push_unique(
                    bear,
                    format!("Trading at {pe:.0}x earnings - limited margin of safety"),
                );
            }
        }

        if self.premium() > 20.0 {
            push_unique(
                bear,
                "Premium valuation relative to peers may not be sustainable".to_string(),
            );
        }

        if let Some(de) = self.analysis.health.debt_to_equity {
            if de > 100.0 {
                push_unique(
                    bear,
                    format!("Elevated debt levels (D/E: {de:.0}%) increase risk"),
                );
            }
        }

        let growth = &self.analysis.growth;
        let revenue_1y = growth.revenue_growth_1y.unwrap_or(0.0);
        let cagr = growth.revenue_cagr_3y.unwrap_or(0.0);
        if cagr > 0.0 && revenue_1y < cagr * 0.7 {
            push_unique(
                bear,
                "Revenue growth decelerating vs historical trend".to_string(),
            );
        }

        let upside = self.upside();
        if upside < -10.0 {
            push_unique(
                bear,
                format!("Trading above analyst price target ({upside:.0}%)"),
            );
        }
    }

    fn monitors(&self) -> Vec<String> {
        let mut monitors: Vec<String> = [
            "Quarterly revenue growth and guidance",
            "Operating margin trends",
            "Free cash flow generation",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let industry = self.industry.unwrap_or_default().to_lowercase();
        let extra: &[&str] = if industry.contains("software") || industry.contains("tech") {
            &[
                "Customer acquisition and retention rates",
                "R&D spending as % of revenue",
            ]
        } else if industry.contains("semiconductor") {
            &[
                "Data center/AI segment growth",
                "Gross margin trends by segment",
            ]
        } else if industry.contains("retail") {
            &["Same-store sales growth", "Inventory turnover"]
        } else if industry.contains("bank") || industry.contains("financial") {
            &["Net interest margin", "Loan loss provisions"]
        } else {
            &[]
        };
        monitors.extend(extra.iter().map(ToString::to_string));

        if self.analysis.valuation.pe_trailing.unwrap_or(0.0) > 30.0 {
            monitors.push("Earnings growth to justify premium valuation".to_string());
        }
        if self.analysis.health.debt_to_equity.unwrap_or(0.0) > 80.0 {
            monitors.push("Debt reduction progress and interest expense".to_string());
        }

        monitors.truncate(MAX_MONITORS);
        monitors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Category, CategoryScore, Recommendation};

    fn report(factors: &[(Category, &[&str])]) -> ScoreReport {
        ScoreReport {
            ticker: "TEST".to_string(),
            total_score: 5.0,
            recommendation: Recommendation::Hold,
            categories: factors
                .iter()
                .map(|(category, list)| CategoryScore {
                    category: *category,
                    score: 5.0,
                    weight: 0.2,
                    weighted: 1.0,
                    factors: list.iter().map(ToString::to_string).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_classifier_priority() {
        let c = KeywordClassifier::default();
        assert_eq!(c.classify("Strong revenue growth (30.0%)"), Polarity::Bull);
        assert_eq!(c.classify("Revenue declining (-5.0%)"), Polarity::Bear);
        // "Low P/E" hits both tables; bull is checked first
        assert_eq!(c.classify("Low P/E (12.0x) suggests value"), Polarity::Bull);
        assert_eq!(c.classify("Conservative capital structure"), Polarity::Neutral);
    }

    #[test]
    fn test_partition_dedup_and_truncate() {
        let analysis = FinancialAnalysis::default();
        let scores = report(&[
            (
                Category::Growth,
                &[
                    "Strong revenue growth (30.0%)",
                    "Revenue declining (-5.0%)",
                    "Excellent ROE",
                    "Good margins",
                ],
            ),
            (
                Category::Profitability,
                &[
                    "Strong revenue growth (30.0%)",
                    "Healthy cash",
                    "Attractive PEG",
                    "Upside to target",
                ],
            ),
        ]);
        let thesis = ThesisComposer {
            analysis: &analysis,
            scores: &scores,
            peers: None,
            sentiment: None,
            industry: None,
        }
        .compose();

        assert_eq!(thesis.bull_case.len(), 5);
        assert_eq!(thesis.bull_case[0], "Strong revenue growth (30.0%)");
        assert_eq!(
            thesis.bull_case.iter().filter(|p| p.starts_with("Strong revenue")).count(),
            1
        );
        assert_eq!(thesis.bear_case, vec!["Revenue declining (-5.0%)"]);
        for point in &thesis.bull_case {
            assert!(!thesis.bear_case.contains(point));
        }
        assert_eq!(thesis.monitors.len(), 3);
    }

    #[test]
    fn test_derived_observations() {
        let mut analysis = FinancialAnalysis::default();
        analysis.valuation.pe_trailing = Some(42.0);
        analysis.health.debt_to_equity = Some(150.0);
        analysis.growth.revenue_growth_1y = Some(0.10);
        analysis.growth.revenue_cagr_3y = Some(0.30);
        let scores = report(&[]);
        let thesis = ThesisComposer {
            analysis: &analysis,
            scores: &scores,
            peers: None,
            sentiment: None,
            industry: Some("Semiconductors"),
        }
        .compose();

        assert_eq!(
            thesis.bear_case,
            vec![
                "Trading at 42x earnings - limited margin of safety",
                "Elevated debt levels (D/E: 150%) increase risk",
                "Revenue growth decelerating vs historical trend",
            ]
        );
        assert!(thesis.bull_case.is_empty());
        assert_eq!(thesis.monitors.len(), 7);
        assert!(thesis.monitors.contains(&"Data center/AI segment growth".to_string()));
    }

    #[test]
    fn test_revenue_observation_skipped_when_mentioned() {
        let mut analysis = FinancialAnalysis::default();
        analysis.growth.revenue_growth_1y = Some(0.40);
        let scores = report(&[(Category::Growth, &["Excellent revenue growth (40.0%)"])]);
        let thesis = ThesisComposer {
            analysis: &analysis,
            scores: &scores,
            peers: None,
            sentiment: None,
            industry: None,
        }
        .compose();
        assert_eq!(thesis.bull_case, vec!["Excellent revenue growth (40.0%)"]);
    }
}
