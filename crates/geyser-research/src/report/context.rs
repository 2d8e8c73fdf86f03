//! Template variables for each report section

use crate::analysis::FinancialAnalysis;
use crate::collector::CompanyData;
use crate::error::Result;
use crate::peers::PeerSummary;
use crate::scoring::{RecommendationThresholds, ScoreReport};
use crate::sentiment::SentimentSummary;
use crate::thesis::InvestmentThesis;
use chrono::NaiveDate;
use geyser_template::{MarkdownBuilder, format};
use serde_json::{Value, json};

/// Everything the report draws on
pub struct ReportInputs<'a> {
    pub data: &'a CompanyData,
    pub analysis: &'a FinancialAnalysis,
    pub peers: Option<&'a PeerSummary>,
    pub sentiment: &'a SentimentSummary,
    pub scores: &'a ScoreReport,
    pub thesis: &'a InvestmentThesis,
    pub thresholds: &'a RecommendationThresholds,
    pub generated_on: NaiveDate,
    pub data_sources: String,
}

fn truthy(value: Option<f64>) -> f64 {
    value.filter(|v| *v != 0.0).unwrap_or(0.0)
}

pub(super) fn pe_assessment(pe: Option<f64>) -> &'static str {
    let pe = truthy(pe);
    if pe > 25.0 {
        "Premium"
    } else if pe > 15.0 {
        "Fair"
    } else {
        "Value"
    }
}

pub(super) fn peg_assessment(peg: Option<f64>) -> &'static str {
    let peg = peg.filter(|v| *v != 0.0).unwrap_or(99.0);
    if peg < 1.0 {
        "Attractive"
    } else if peg < 2.0 {
        "Fair"
    } else {
        "Expensive"
    }
}

fn current_ratio_assessment(ratio: Option<f64>) -> &'static str {
    let ratio = truthy(ratio);
    if ratio > 1.5 {
        "Strong"
    } else if ratio > 1.0 {
        "Adequate"
    } else {
        "Weak"
    }
}

/// Debt/equity in percent units
fn leverage_assessment(de: Option<f64>) -> &'static str {
    let de = truthy(de);
    if de < 50.0 {
        "Low"
    } else if de < 100.0 {
        "Moderate"
    } else {
        "High"
    }
}

fn coverage_assessment(coverage: Option<f64>) -> &'static str {
    let coverage = truthy(coverage);
    if coverage > 5.0 {
        "Strong"
    } else if coverage > 2.0 {
        "Adequate"
    } else {
        "Weak"
    }
}

pub(super) fn altman_assessment(z: Option<f64>) -> &'static str {
    let z = truthy(z);
    if z > 3.0 {
        "Safe"
    } else if z > 1.8 {
        "Gray Zone"
    } else {
        "Distress"
    }
}

pub(super) fn executive_summary(inputs: &ReportInputs<'_>) -> Value {
    let overview = &inputs.data.overview;
    json!({
        "ticker": inputs.data.ticker,
        "company_name": overview.display_name(),
        "sector": overview.sector,
        "industry": overview.industry,
        "recommendation": inputs.scores.recommendation.as_str(),
        "total_score": inputs.scores.total_score,
        "current_price": overview.current_price,
        "market_cap": overview.market_cap,
        "pe_trailing": inputs.analysis.valuation.pe_trailing,
        "revenue_growth": inputs.analysis.growth.revenue_growth_1y,
        "net_margin": inputs.analysis.profitability.net_margin,
        "generated_on": inputs.generated_on.format("%B %d, %Y").to_string(),
    })
}

pub(super) fn company_overview(inputs: &ReportInputs<'_>) -> Value {
    let overview = &inputs.data.overview;
    let returns = &inputs.analysis.returns;
    json!({
        "description": overview
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Business description not available."),
        "country": overview.country,
        "employees": format::count(overview.employees),
        "website": overview.website,
        "market_cap": overview.market_cap,
        "enterprise_value": overview.enterprise_value,
        "fifty_two_week_high": overview.fifty_two_week_high,
        "fifty_two_week_low": overview.fifty_two_week_low,
        // Stored in percent units; the filter expects a fraction
        "pct_from_52w_high": overview.pct_from_52w_high.map(|p| p / 100.0),
        "fifty_day_avg": overview.fifty_day_avg,
        "two_hundred_day_avg": overview.two_hundred_day_avg,
        "return_1y": returns.return_1y,
        "return_ytd": returns.return_ytd,
        "max_drawdown": returns.max_drawdown,
        "sharpe_ratio_1y": returns.sharpe_ratio_1y,
    })
}

pub(super) fn financial_analysis(inputs: &ReportInputs<'_>) -> Result<Value> {
    let a = inputs.analysis;
    let de = a.health.debt_to_equity;
    Ok(json!({
        "valuation": serde_json::to_value(&a.valuation)?,
        "profitability": serde_json::to_value(&a.profitability)?,
        "growth": serde_json::to_value(&a.growth)?,
        "health": serde_json::to_value(&a.health)?,
        "efficiency": serde_json::to_value(&a.efficiency)?,
        "debt_to_equity_ratio": de.filter(|v| *v != 0.0).map(|v| v / 100.0),
        "assessments": {
            "pe": pe_assessment(a.valuation.pe_trailing),
            "peg": peg_assessment(a.valuation.peg_ratio),
            "current_ratio": current_ratio_assessment(a.health.current_ratio),
            "debt_to_equity": leverage_assessment(de),
            "interest_coverage": coverage_assessment(a.health.interest_coverage),
            "altman_z": altman_assessment(a.health.altman_z_score),
        },
    }))
}

fn matrix_table(peers: &PeerSummary) -> String {
    let matrix = &peers.matrix;
    if matrix.is_empty() {
        return "Peer comparison data not available.".to_string();
    }
    let headers = matrix.headers();
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    let rows: Vec<Vec<String>> = matrix.rows.iter().map(|r| r.display_cells()).collect();
    MarkdownBuilder::new().table(&headers, &rows).build()
}

pub(super) fn peer_comparison(inputs: &ReportInputs<'_>) -> Value {
    let Some(peers) = inputs.peers else {
        return json!({
            "peers": [],
            "matrix_table": "Peer comparison data not available.",
            "factors_supporting": [],
            "factors_against": [],
        });
    };
    let relative = &peers.relative_valuation;
    let justification = &peers.justification;
    json!({
        "peers": peers.peers,
        "matrix_table": matrix_table(peers),
        "assessment": relative.assessment.to_string(),
        "assessment_detail": relative.detail,
        "conclusion": justification.conclusion,
        "factors_supporting": justification.factors_supporting,
        "factors_against": justification.factors_against,
    })
}

pub(super) fn sentiment(inputs: &ReportInputs<'_>) -> Result<Value> {
    let s = inputs.sentiment;
    Ok(json!({
        "analyst": serde_json::to_value(&s.analyst)?,
        "targets": serde_json::to_value(&s.analyst.price_targets)?,
        "upside": s.analyst.upside_pct.filter(|v| *v != 0.0).map(|v| v / 100.0),
        "earnings": serde_json::to_value(&s.earnings)?,
        "avg_surprise": s.earnings.avg_surprise_pct.map(|v| v / 100.0),
        "insider": serde_json::to_value(&s.insider)?,
        "ownership": serde_json::to_value(&s.ownership)?,
        "momentum": serde_json::to_value(&s.momentum)?,
        "overall_score": s.overall_score,
        "overall_label": s.overall_label,
    }))
}

pub(super) fn investment_thesis(inputs: &ReportInputs<'_>) -> Value {
    json!({
        "bull_case": inputs.thesis.bull_case,
        "bear_case": inputs.thesis.bear_case,
        "monitors": inputs.thesis.monitors,
    })
}

fn commentary(inputs: &ReportInputs<'_>) -> String {
    let ticker = &inputs.data.ticker;
    let score = inputs.scores.total_score;
    let sector = inputs.data.overview.sector.as_deref().unwrap_or("sector");

    let mut text = if score >= 7.5 {
        format!(
            "{ticker} presents a compelling investment opportunity with strong fundamentals \
             across multiple dimensions. The company demonstrates "
        )
    } else if score >= 6.0 {
        format!(
            "{ticker} offers an attractive risk/reward profile for investors seeking exposure \
             to the {sector}. While not without risks, the company shows "
        )
    } else if score >= 5.0 {
        format!("{ticker} appears fairly valued at current levels. The company has ")
    } else {
        format!("{ticker} faces headwinds that warrant caution. Investors should consider ")
    };

    let categories = &inputs.scores.categories;
    let strengths: Vec<String> = categories
        .iter()
        .filter(|c| c.score >= 7.0)
        .map(|c| c.category.display_name().to_lowercase())
        .collect();
    let weaknesses: Vec<String> = categories
        .iter()
        .filter(|c| c.score < 4.0)
        .map(|c| c.category.display_name().to_lowercase())
        .collect();

    if !strengths.is_empty() {
        text.push_str(&format!("notable strengths in {}. ", strengths.join(", ")));
    }
    if !weaknesses.is_empty() {
        text.push_str(&format!(
            "However, concerns remain around {}. ",
            weaknesses.join(", ")
        ));
    }
    text.trim_end().to_string()
}

fn investor_profile(score: f64) -> &'static str {
    if score >= 7.0 {
        "Growth-oriented investors with medium to high risk tolerance."
    } else if score >= 5.0 {
        "Balanced investors seeking core portfolio holdings."
    } else {
        "Risk-averse investors may want to avoid or reduce exposure."
    }
}

fn position_sizing(score: f64) -> &'static str {
    if score >= 8.0 {
        "High conviction - suitable for larger portfolio allocation (3-5%)."
    } else if score >= 6.5 {
        "Moderate conviction - consider standard position size (1-3%)."
    } else if score >= 5.0 {
        "Lower conviction - smaller position size warranted (0.5-1%)."
    } else {
        "Low conviction - avoid or minimal position only."
    }
}

pub(super) fn recommendation(inputs: &ReportInputs<'_>) -> Value {
    let scores = inputs.scores;
    let rows: Vec<Value> = scores
        .categories
        .iter()
        .map(|c| {
            json!({
                "name": c.category.display_name(),
                "weight": format!("{:.0}%", c.weight * 100.0),
                "score": format!("{:.1}", c.score),
                "weighted": format!("{:.2}", c.weighted),
            })
        })
        .collect();

    json!({
        "categories": rows,
        "total_score": format!("{:.1}", scores.total_score),
        "recommendation": scores.recommendation.as_str(),
        "thresholds": inputs.thresholds,
        "commentary": commentary(inputs),
        "investor_profile": investor_profile(scores.total_score),
        "position_sizing": position_sizing(scores.total_score),
    })
}

pub(super) fn disclaimer(inputs: &ReportInputs<'_>) -> Value {
    json!({ "data_sources": inputs.data_sources })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessments() {
        assert_eq!(pe_assessment(Some(30.0)), "Premium");
        assert_eq!(pe_assessment(Some(20.0)), "Fair");
        assert_eq!(pe_assessment(None), "Value");
        assert_eq!(peg_assessment(None), "Expensive");
        assert_eq!(peg_assessment(Some(0.8)), "Attractive");
        assert_eq!(current_ratio_assessment(Some(1.2)), "Adequate");
        assert_eq!(leverage_assessment(Some(75.0)), "Moderate");
        assert_eq!(coverage_assessment(Some(1.0)), "Weak");
        assert_eq!(altman_assessment(Some(2.5)), "Gray Zone");
    }

    #[test]
    fn test_profile_and_sizing_ladders() {
        assert!(investor_profile(7.0).starts_with("Growth"));
        assert!(investor_profile(4.9).starts_with("Risk-averse"));
        assert!(position_sizing(8.0).starts_with("High"));
        assert!(position_sizing(6.5).starts_with("Moderate"));
        assert!(position_sizing(5.0).starts_with("Lower"));
    }
}
