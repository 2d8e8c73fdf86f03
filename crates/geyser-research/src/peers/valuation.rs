//! Relative valuation against the peer set and its justification

use super::matrix::ComparisonMatrix;
use crate::analysis::mean;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiples used for the premium/discount assessment
pub const VALUATION_METRICS: &[&str] = &["P/E (TTM)", "P/E (Forward)", "EV/EBITDA", "P/S", "P/B"];
const GROWTH_METRICS: &[&str] = &["Revenue Growth", "Earnings Growth"];
const PROFIT_METRICS: &[&str] = &["Net Margin", "ROE", "ROA"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValuationBand {
    SignificantPremium,
    ModeratePremium,
    InLine,
    ModerateDiscount,
    SignificantDiscount,
}

impl ValuationBand {
    pub fn from_premium(avg_premium: f64) -> Self {
        if avg_premium > 30.0 {
            Self::SignificantPremium
        } else if avg_premium > 10.0 {
            Self::ModeratePremium
        } else if avg_premium > -10.0 {
            Self::InLine
        } else if avg_premium > -30.0 {
            Self::ModerateDiscount
        } else {
            Self::SignificantDiscount
        }
    }

    /// One-sentence description of the average premium
    pub fn detail(&self, avg_premium: f64) -> String {
        match self {
            Self::SignificantPremium | Self::ModeratePremium => {
                format!("Trading at {avg_premium:.0}% premium to peers on average")
            }
            Self::InLine => format!("Trading roughly in-line with peers ({avg_premium:+.0}%)"),
            Self::ModerateDiscount | Self::SignificantDiscount => format!(
                "Trading at {:.0}% discount to peers on average",
                avg_premium.abs()
            ),
        }
    }
}

impl fmt::Display for ValuationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SignificantPremium => "Significant Premium",
            Self::ModeratePremium => "Moderate Premium",
            Self::InLine => "In-Line",
            Self::ModerateDiscount => "Moderate Discount",
            Self::SignificantDiscount => "Significant Discount",
        })
    }
}

/// Target versus peers on one multiple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub target: f64,
    pub peer_avg: f64,
    pub peer_min: f64,
    pub peer_max: f64,
    /// Percent above (positive) or below the peer average
    pub premium_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelativeValuation {
    pub metrics: Vec<MetricComparison>,
    /// Mean of the evaluated premiums, 0 when none were evaluated
    pub avg_premium: f64,
    pub assessment: ValuationBand,
    pub detail: String,
}

impl RelativeValuation {
    pub fn calculate(matrix: &ComparisonMatrix) -> Self {
        let metrics: Vec<MetricComparison> = VALUATION_METRICS
            .iter()
            .filter_map(|name| {
                let row = matrix.row(name)?;
                let target = row.target?;
                let values = row.peer_values();
                let peer_avg = mean(&values)?;
                let premium_pct = if peer_avg > 0.0 {
                    (target / peer_avg - 1.0) * 100.0
                } else {
                    0.0
                };
                Some(MetricComparison {
                    metric: (*name).to_string(),
                    target,
                    peer_avg,
                    peer_min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    peer_max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    premium_pct,
                })
            })
            .collect();

        let premiums: Vec<f64> = metrics.iter().map(|m| m.premium_pct).collect();
        let avg_premium = mean(&premiums).unwrap_or(0.0);
        let assessment = ValuationBand::from_premium(avg_premium);

        Self {
            metrics,
            avg_premium,
            detail: assessment.detail(avg_premium),
            assessment,
        }
    }

    pub fn premium(&self, metric: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.metric == metric)
            .map(|m| m.premium_pct)
    }
}

/// Whether fundamentals back the premium or discount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationJustification {
    pub valuation_status: ValuationBand,
    pub factors_supporting: Vec<String>,
    pub factors_against: Vec<String>,
    pub conclusion: String,
}

impl ValuationJustification {
    pub fn assess(matrix: &ComparisonMatrix, relative: &RelativeValuation) -> Self {
        let mut supporting = Vec::new();
        let mut against = Vec::new();

        let metrics = GROWTH_METRICS
            .iter()
            .map(|m| (m, false))
            .chain(PROFIT_METRICS.iter().map(|m| (m, true)));

        for (name, needs_nonzero_avg) in metrics {
            let Some(row) = matrix.row(name) else { continue };
            let (Some(target), Some(avg)) = (row.target, row.peer_avg) else {
                continue;
            };
            if needs_nonzero_avg && avg == 0.0 {
                continue;
            }
            let label = name.to_lowercase();
            if target > avg * 1.2 {
                supporting.push(format!(
                    "Higher {label} ({:.1}% vs peer avg {:.1}%)",
                    target * 100.0,
                    avg * 100.0
                ));
            } else if target < avg * 0.8 {
                against.push(format!(
                    "Lower {label} ({:.1}% vs peer avg {:.1}%)",
                    target * 100.0,
                    avg * 100.0
                ));
            }
        }

        let conclusion = conclusion(relative.avg_premium, supporting.len(), against.len());
        Self {
            valuation_status: relative.assessment,
            factors_supporting: supporting,
            factors_against: against,
            conclusion: conclusion.to_string(),
        }
    }
}

fn conclusion(avg_premium: f64, supporting: usize, against: usize) -> &'static str {
    if avg_premium > 10.0 {
        match supporting.cmp(&against) {
            std::cmp::Ordering::Greater => "Premium appears JUSTIFIED by superior fundamentals",
            std::cmp::Ordering::Less => {
                "Premium may be UNJUSTIFIED - fundamentals don't support valuation"
            }
            std::cmp::Ordering::Equal => {
                "Premium justification is MIXED - some fundamentals support, others don't"
            }
        }
    } else if avg_premium < -10.0 {
        match against.cmp(&supporting) {
            std::cmp::Ordering::Greater => "Discount appears JUSTIFIED by weaker fundamentals",
            std::cmp::Ordering::Less => {
                "Discount may be UNJUSTIFIED - could be undervalued opportunity"
            }
            std::cmp::Ordering::Equal => "Discount justification is MIXED",
        }
    } else {
        "Valuation is roughly in-line with peers and fundamentals"
    }
}
