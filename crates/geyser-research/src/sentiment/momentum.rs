use crate::analysis::{ReturnMetrics, TechnicalIndicators};
use crate::model::CompanyOverview;
use serde::{Deserialize, Serialize};

const NEUTRAL_SCORE: f64 = 5.0;

/// Trailing returns carried alongside the momentum score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceMomentum {
    pub return_1m: Option<f64>,
    pub return_3m: Option<f64>,
    pub return_6m: Option<f64>,
    pub return_1y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSentiment {
    /// 1-10, one decimal
    pub momentum_score: f64,
    pub momentum_label: String,
    pub signals: Vec<String>,
    pub rsi: Option<f64>,
    pub price_momentum: PriceMomentum,
}

impl Default for MomentumSentiment {
    fn default() -> Self {
        Self {
            momentum_score: NEUTRAL_SCORE,
            momentum_label: momentum_label(NEUTRAL_SCORE).to_string(),
            signals: Vec::new(),
            rsi: None,
            price_momentum: PriceMomentum::default(),
        }
    }
}

fn momentum_label(score: f64) -> &'static str {
    if score >= 7.0 {
        "Strong Bullish"
    } else if score >= 6.0 {
        "Bullish"
    } else if score >= 4.0 {
        "Neutral"
    } else if score >= 3.0 {
        "Bearish"
    } else {
        "Strong Bearish"
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

struct Tally {
    score: f64,
    signals: Vec<String>,
}

impl Tally {
    fn add(&mut self, delta: f64, signal: &str) {
        self.score += delta;
        self.signals.push(signal.to_string());
    }
}

pub(super) fn analyze(
    overview: &CompanyOverview,
    returns: &ReturnMetrics,
    technicals: &TechnicalIndicators,
) -> MomentumSentiment {
    let mut tally = Tally {
        score: NEUTRAL_SCORE,
        signals: Vec::new(),
    };

    let r1m = returns.return_1m.unwrap_or(0.0);
    if r1m > 0.10 {
        tally.add(1.0, "Strong 1M momentum (+10%+)");
    } else if r1m > 0.05 {
        tally.add(0.5, "Positive 1M momentum (+5%+)");
    } else if r1m < -0.10 {
        tally.add(-1.0, "Weak 1M momentum (-10%+)");
    } else if r1m < -0.05 {
        tally.add(-0.5, "Negative 1M momentum (-5%+)");
    }

    let price = overview.current_price.filter(|p| *p != 0.0);
    let ma50 = overview.fifty_day_avg.filter(|p| *p != 0.0);
    let ma200 = overview.two_hundred_day_avg.filter(|p| *p != 0.0);

    if let (Some(price), Some(ma)) = (price, ma50) {
        if price > ma {
            tally.add(0.5, "Price above 50-day MA");
        } else {
            tally.add(-0.5, "Price below 50-day MA");
        }
    }
    if let (Some(price), Some(ma)) = (price, ma200) {
        if price > ma {
            tally.add(0.5, "Price above 200-day MA");
        } else {
            tally.add(-0.5, "Price below 200-day MA");
        }
    }
    if let (Some(short), Some(long)) = (ma50, ma200) {
        if short > long {
            tally.add(0.5, "Golden cross (50MA > 200MA)");
        } else {
            tally.add(-0.5, "Death cross (50MA < 200MA)");
        }
    }

    let from_high = overview.pct_from_52w_high.unwrap_or(0.0);
    if from_high > -5.0 {
        tally.add(0.5, "Near 52-week high");
    } else if from_high < -30.0 {
        tally.add(-0.5, "Significantly below 52-week high (>30%)");
    }

    let score = tally.score.clamp(1.0, 10.0);
    let mut signals = tally.signals;

    // RSI extremes are reported but do not move the score
    let rsi = technicals.rsi_14;
    if let Some(rsi) = rsi {
        if rsi > 70.0 {
            signals.push(format!("RSI overbought ({rsi:.0})"));
        } else if rsi < 30.0 {
            signals.push(format!("RSI oversold ({rsi:.0})"));
        }
    }

    MomentumSentiment {
        momentum_score: round1(score),
        momentum_label: momentum_label(score).to_string(),
        signals,
        rsi,
        price_momentum: PriceMomentum {
            return_1m: returns.return_1m,
            return_3m: returns.return_3m,
            return_6m: returns.return_6m,
            return_1y: returns.return_1y,
        },
    }
}
