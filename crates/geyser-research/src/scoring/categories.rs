//! The six category scorers
//!
//! Every scorer starts from a baseline, applies independent per-metric
//! threshold ladders (first match wins within a ladder) and clamps to
//! [1, 10]. Guards that read a metric as "present" treat zero as absent,
//! except where noted.

use super::ScoringInputs;

const BASELINE: f64 = 5.0;
const MIN_SCORE: f64 = 1.0;
const MAX_SCORE: f64 = 10.0;
const SIGNALS_CARRIED: usize = 3;

/// Unclamped running score with its explanation lines
pub(super) struct Scorecard {
    score: f64,
    factors: Vec<String>,
}

impl Scorecard {
    fn new(baseline: f64) -> Self {
        Self {
            score: baseline,
            factors: Vec::new(),
        }
    }

    fn add(&mut self, delta: f64, factor: impl Into<String>) {
        self.score += delta;
        self.factors.push(factor.into());
    }

    /// Clamped score and factors
    pub(super) fn finish(self) -> (f64, Vec<String>) {
        (self.score.clamp(MIN_SCORE, MAX_SCORE), self.factors)
    }
}

fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn pct1(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn pct0(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

pub(super) fn valuation(inputs: &ScoringInputs) -> Scorecard {
    let mut card = Scorecard::new(BASELINE);

    let pe = present(inputs.pe_trailing);
    if let Some(pe) = pe {
        if pe < 15.0 {
            card.add(1.5, format!("Low P/E ({pe:.1}x) suggests value"));
        } else if pe < 25.0 {
            card.add(0.5, format!("Reasonable P/E ({pe:.1}x)"));
        } else if pe > 50.0 {
            card.add(-1.5, format!("High P/E ({pe:.1}x) suggests premium valuation"));
        } else if pe > 35.0 {
            card.add(-0.5, format!("Elevated P/E ({pe:.1}x)"));
        }
    }

    if let (Some(pe), Some(forward)) = (pe, present(inputs.pe_forward)) {
        if forward < pe * 0.8 {
            card.add(0.5, "Forward P/E significantly lower - growth expected");
        } else if forward > pe * 1.2 {
            card.add(-0.5, "Forward P/E higher - potential earnings decline");
        }
    }

    if let Some(peg) = present(inputs.peg_ratio) {
        if peg < 1.0 {
            card.add(1.0, format!("Attractive PEG ratio ({peg:.2})"));
        } else if peg > 2.0 {
            card.add(-0.5, format!("High PEG ratio ({peg:.2})"));
        }
    }

    let premium = inputs.peer_premium.unwrap_or(0.0);
    if premium < -20.0 {
        card.add(1.0, format!("Trading at {:.0}% discount to peers", premium.abs()));
    } else if premium < -10.0 {
        card.add(0.5, "Trading at slight discount to peers");
    } else if premium > 30.0 {
        card.add(-1.0, format!("Significant premium ({premium:.0}%) vs peers"));
    } else if premium > 15.0 {
        card.add(-0.5, "Premium valuation vs peers");
    }

    if let Some(fcf_yield) = present(inputs.fcf_yield) {
        if fcf_yield > 0.06 {
            card.add(0.5, format!("Strong FCF yield ({})", pct1(fcf_yield)));
        } else if fcf_yield < 0.02 {
            card.add(-0.5, format!("Low FCF yield ({})", pct1(fcf_yield)));
        }
    }

    card
}

pub(super) fn growth(inputs: &ScoringInputs) -> Scorecard {
    let mut card = Scorecard::new(BASELINE);

    if let Some(g) = present(inputs.revenue_growth) {
        if g > 0.30 {
            card.add(2.0, format!("Excellent revenue growth ({})", pct1(g)));
        } else if g > 0.15 {
            card.add(1.0, format!("Strong revenue growth ({})", pct1(g)));
        } else if g > 0.05 {
            card.add(0.5, format!("Moderate revenue growth ({})", pct1(g)));
        } else if g < 0.0 {
            card.add(-1.0, format!("Revenue declining ({})", pct1(g)));
        }
    }

    if let Some(cagr) = present(inputs.revenue_cagr_3y) {
        if cagr > 0.20 {
            card.add(1.0, format!("Strong 3-year revenue CAGR ({})", pct1(cagr)));
        } else if cagr < 0.05 {
            card.add(-0.5, "Slow revenue growth over 3 years");
        }
    }

    if let Some(eps) = present(inputs.eps_growth_1y) {
        if eps > 0.25 {
            card.add(1.0, format!("Strong EPS growth ({})", pct1(eps)));
        } else if eps < 0.0 {
            card.add(-1.0, format!("EPS declining ({})", pct1(eps)));
        }
    }

    if let Some(fcf) = present(inputs.fcf_growth_1y) {
        if fcf > 0.20 {
            card.add(0.5, format!("Strong FCF growth ({})", pct1(fcf)));
        } else if fcf < -0.20 {
            card.add(-0.5, "FCF declining significantly");
        }
    }

    card
}

pub(super) fn profitability(inputs: &ScoringInputs) -> Scorecard {
    let mut card = Scorecard::new(BASELINE);

    if let Some(m) = present(inputs.gross_margin) {
        if m > 0.60 {
            card.add(1.5, format!("Excellent gross margin ({})", pct1(m)));
        } else if m > 0.40 {
            card.add(0.5, format!("Good gross margin ({})", pct1(m)));
        } else if m < 0.20 {
            card.add(-1.0, format!("Low gross margin ({})", pct1(m)));
        }
    }

    if let Some(m) = present(inputs.operating_margin) {
        if m > 0.25 {
            card.add(1.0, format!("Strong operating margin ({})", pct1(m)));
        } else if m > 0.15 {
            card.add(0.5, format!("Healthy operating margin ({})", pct1(m)));
        } else if m < 0.05 {
            card.add(-1.0, format!("Thin operating margin ({})", pct1(m)));
        }
    }

    if let Some(roe) = present(inputs.roe) {
        if roe > 0.25 {
            card.add(1.0, format!("Excellent ROE ({})", pct1(roe)));
        } else if roe > 0.15 {
            card.add(0.5, format!("Good ROE ({})", pct1(roe)));
        } else if roe < 0.08 {
            card.add(-0.5, format!("Low ROE ({})", pct1(roe)));
        }
    }

    if let Some(roic) = present(inputs.roic) {
        if roic > 0.20 {
            card.add(
                1.0,
                format!("High ROIC ({}) - efficient capital allocation", pct1(roic)),
            );
        } else if roic < 0.08 {
            card.add(-0.5, format!("Low ROIC ({})", pct1(roic)));
        }
    }

    card
}

pub(super) fn financial_health(inputs: &ScoringInputs) -> Scorecard {
    let mut card = Scorecard::new(BASELINE);

    if let Some(cr) = present(inputs.current_ratio) {
        if cr > 2.0 {
            card.add(1.0, format!("Strong current ratio ({cr:.2})"));
        } else if cr > 1.5 {
            card.add(0.5, format!("Healthy current ratio ({cr:.2})"));
        } else if cr < 1.0 {
            card.add(-1.0, format!("Low current ratio ({cr:.2}) - liquidity risk"));
        }
    }

    // Zero debt is a real reading here
    if let Some(de) = inputs.debt_to_equity {
        if de < 30.0 {
            card.add(1.0, format!("Low leverage (D/E: {de:.0}%)"));
        } else if de < 100.0 {
            card.add(0.5, format!("Moderate leverage (D/E: {de:.0}%)"));
        } else if de > 200.0 {
            card.add(-1.0, format!("High leverage (D/E: {de:.0}%)"));
        }
    }

    if let Some(ic) = present(inputs.interest_coverage) {
        if ic > 10.0 {
            card.add(1.0, format!("Excellent interest coverage ({ic:.1}x)"));
        } else if ic > 5.0 {
            card.add(0.5, format!("Good interest coverage ({ic:.1}x)"));
        } else if ic < 2.0 {
            card.add(-1.0, format!("Low interest coverage ({ic:.1}x) - debt risk"));
        }
    }

    if let Some(z) = present(inputs.altman_z_score) {
        if z > 3.0 {
            card.add(
                0.5,
                format!("Strong Altman Z-Score ({z:.2}) - low bankruptcy risk"),
            );
        } else if z < 1.8 {
            card.add(-1.0, format!("Low Altman Z-Score ({z:.2}) - elevated risk"));
        }
    }

    card
}

/// Starts from the technical momentum sub-score rather than the neutral baseline
pub(super) fn momentum_sentiment(inputs: &ScoringInputs) -> Scorecard {
    let mut card = Scorecard::new(inputs.momentum_score.unwrap_or(BASELINE));
    card.factors
        .extend(inputs.technical_signals.iter().take(SIGNALS_CARRIED).cloned());

    if let Some(rating) = present(inputs.analyst_mean_rating) {
        if rating <= 2.0 {
            card.add(1.0, "Strong analyst buy consensus");
        } else if rating <= 2.5 {
            card.add(0.5, "Positive analyst sentiment");
        } else if rating >= 4.0 {
            card.add(-1.0, "Bearish analyst sentiment");
        }
    }

    if let Some(upside) = inputs.target_upside_pct {
        if upside > 20.0 {
            card.add(
                0.5,
                format!("Significant upside to price target ({upside:.0}%)"),
            );
        } else if upside < -10.0 {
            card.add(-0.5, format!("Below analyst price target ({upside:.0}%)"));
        }
    }

    if let Some(rate) = inputs.earnings_beat_rate {
        if rate >= 0.75 {
            card.add(0.5, format!("Strong earnings beat rate ({})", pct0(rate)));
        } else if rate < 0.5 {
            card.add(-0.5, format!("Weak earnings beat rate ({})", pct0(rate)));
        }
    }

    card
}

pub(super) fn quality_moat(inputs: &ScoringInputs) -> Scorecard {
    let mut card = Scorecard::new(BASELINE);

    let gross = inputs.gross_margin.unwrap_or(0.0);
    let op = inputs.operating_margin.unwrap_or(0.0);
    if gross > 0.50 && op > 0.20 {
        card.add(1.5, "High margins suggest pricing power/moat");
    } else if gross > 0.40 && op > 0.15 {
        card.add(0.5, "Healthy margins indicate competitive position");
    }

    if inputs.roe.unwrap_or(0.0) > 0.20 && inputs.roic.unwrap_or(0.0) > 0.15 {
        card.add(1.0, "High ROE & ROIC suggest durable competitive advantage");
    }

    if inputs.revenue_cagr_3y.unwrap_or(0.0) > 0.10 {
        card.add(0.5, "Consistent revenue growth demonstrates market position");
    }

    // Missing or zero leverage reads as 100
    if present(inputs.debt_to_equity).unwrap_or(100.0) < 50.0 {
        card.add(0.5, "Conservative capital structure");
    }

    if inputs.fcf_yield.unwrap_or(0.0) > 0.04 {
        card.add(0.5, "Strong free cash flow generation");
    }

    card
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(card: Scorecard) -> (f64, Vec<String>) {
        card.finish()
    }

    #[test]
    fn test_empty_inputs_score_baseline() {
        let inputs = ScoringInputs::default();
        let (score, factors) = run(valuation(&inputs));
        assert_eq!(score, 5.0);
        assert!(factors.is_empty());
        assert_eq!(run(growth(&inputs)).0, 5.0);
        assert_eq!(run(profitability(&inputs)).0, 5.0);
        assert_eq!(run(financial_health(&inputs)).0, 5.0);
        assert_eq!(run(momentum_sentiment(&inputs)).0, 5.0);
        assert_eq!(run(quality_moat(&inputs)).0, 5.0);
    }

    #[test]
    fn test_pe_ladder_first_match_wins() {
        // 60 is also > 35, but only the first rung applies
        let inputs = ScoringInputs {
            pe_trailing: Some(60.0),
            ..Default::default()
        };
        let (score, factors) = run(valuation(&inputs));
        assert_eq!(score, 3.5);
        assert_eq!(factors, vec!["High P/E (60.0x) suggests premium valuation"]);
    }

    #[test]
    fn test_valuation_clamped() {
        let inputs = ScoringInputs {
            pe_trailing: Some(10_000.0),
            pe_forward: Some(20_000.0),
            peg_ratio: Some(50.0),
            peer_premium: Some(500.0),
            fcf_yield: Some(0.001),
            ..Default::default()
        };
        let (score, factors) = run(valuation(&inputs));
        // 5 - 1.5 - 0.5 - 0.5 - 1 - 0.5 = 1.0
        assert_eq!(score, 1.0);
        assert_eq!(factors.len(), 5);
    }

    #[test]
    fn test_peer_discount_factor() {
        let inputs = ScoringInputs {
            peer_premium: Some(-25.0),
            ..Default::default()
        };
        let (score, factors) = run(valuation(&inputs));
        assert_eq!(score, 6.0);
        assert_eq!(factors, vec!["Trading at 25% discount to peers"]);
    }

    #[test]
    fn test_growth_factor_text() {
        let inputs = ScoringInputs {
            revenue_growth: Some(0.35),
            revenue_cagr_3y: Some(0.02),
            ..Default::default()
        };
        let (score, factors) = run(growth(&inputs));
        assert_eq!(score, 6.5);
        assert_eq!(
            factors,
            vec![
                "Excellent revenue growth (35.0%)",
                "Slow revenue growth over 3 years"
            ]
        );
    }

    #[test]
    fn test_zero_debt_counts_as_low_leverage() {
        let inputs = ScoringInputs {
            debt_to_equity: Some(0.0),
            ..Default::default()
        };
        let (score, factors) = run(financial_health(&inputs));
        assert_eq!(score, 6.0);
        assert_eq!(factors, vec!["Low leverage (D/E: 0%)"]);

        // Quality reads zero as missing
        assert_eq!(run(quality_moat(&inputs)).0, 5.0);
    }

    #[test]
    fn test_health_distress() {
        let inputs = ScoringInputs {
            current_ratio: Some(0.8),
            debt_to_equity: Some(250.0),
            interest_coverage: Some(1.5),
            altman_z_score: Some(1.2),
            ..Default::default()
        };
        let (score, _) = run(financial_health(&inputs));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_momentum_starts_from_sub_score() {
        let inputs = ScoringInputs {
            momentum_score: Some(7.0),
            technical_signals: vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "d".to_string(),
            ],
            analyst_mean_rating: Some(1.8),
            target_upside_pct: Some(-12.0),
            earnings_beat_rate: Some(0.75),
            ..Default::default()
        };
        let (score, factors) = run(momentum_sentiment(&inputs));
        assert_eq!(score, 8.0);
        assert_eq!(factors.len(), 6);
        assert_eq!(factors[3], "Strong analyst buy consensus");
        assert_eq!(factors[5], "Strong earnings beat rate (75%)");
    }

    #[test]
    fn test_quality_moat() {
        let inputs = ScoringInputs {
            gross_margin: Some(0.65),
            operating_margin: Some(0.30),
            roe: Some(0.30),
            roic: Some(0.25),
            revenue_cagr_3y: Some(0.25),
            debt_to_equity: Some(20.0),
            fcf_yield: Some(0.05),
            ..Default::default()
        };
        let (score, factors) = run(quality_moat(&inputs));
        assert_eq!(score, 9.0);
        assert_eq!(factors.len(), 5);
    }
}
