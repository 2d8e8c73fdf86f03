use crate::analysis::FinancialAnalysis;
use crate::peers::PeerSummary;
use crate::sentiment::SentimentSummary;

/// Flat view of every value the category scorers read
///
/// Built from the analysis, peer and sentiment stages; tests construct it
/// directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringInputs {
    // Valuation
    pub pe_trailing: Option<f64>,
    pub pe_forward: Option<f64>,
    pub peg_ratio: Option<f64>,
    /// Average premium (percent) to peers across valuation multiples
    pub peer_premium: Option<f64>,
    pub fcf_yield: Option<f64>,
    // Growth
    pub revenue_growth: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    pub eps_growth_1y: Option<f64>,
    pub fcf_growth_1y: Option<f64>,
    // Profitability
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub roe: Option<f64>,
    pub roic: Option<f64>,
    // Financial health
    pub current_ratio: Option<f64>,
    /// Percent units
    pub debt_to_equity: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub altman_z_score: Option<f64>,
    // Momentum and sentiment
    pub momentum_score: Option<f64>,
    pub technical_signals: Vec<String>,
    pub analyst_mean_rating: Option<f64>,
    pub target_upside_pct: Option<f64>,
    pub earnings_beat_rate: Option<f64>,
}

impl ScoringInputs {
    pub fn from_stages(
        analysis: &FinancialAnalysis,
        peers: Option<&PeerSummary>,
        sentiment: Option<&SentimentSummary>,
    ) -> Self {
        let mut inputs = Self {
            pe_trailing: analysis.valuation.pe_trailing,
            pe_forward: analysis.valuation.pe_forward,
            peg_ratio: analysis.valuation.peg_ratio,
            peer_premium: peers.map(PeerSummary::avg_premium),
            fcf_yield: analysis.valuation.fcf_yield,
            revenue_growth: analysis.growth.revenue_growth(),
            revenue_cagr_3y: analysis.growth.revenue_cagr_3y,
            eps_growth_1y: analysis.growth.eps_growth_1y,
            fcf_growth_1y: analysis.growth.fcf_growth_1y,
            gross_margin: analysis.profitability.gross_margin,
            operating_margin: analysis.profitability.operating_margin,
            roe: analysis.profitability.roe,
            roic: analysis.profitability.roic,
            current_ratio: analysis.health.current_ratio,
            debt_to_equity: analysis.health.debt_to_equity,
            interest_coverage: analysis.health.interest_coverage,
            altman_z_score: analysis.health.altman_z_score,
            ..Default::default()
        };

        if let Some(sentiment) = sentiment {
            inputs.momentum_score = Some(sentiment.momentum.momentum_score);
            inputs.technical_signals = sentiment.momentum.signals.clone();
            inputs.analyst_mean_rating = sentiment.analyst.mean_rating;
            inputs.target_upside_pct = sentiment.analyst.upside_pct;
            inputs.earnings_beat_rate = sentiment.earnings.beat_rate;
        }
        inputs
    }
}
