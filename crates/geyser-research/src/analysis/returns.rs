//! Price-based return and risk metrics

use super::{mean, sample_std};
use crate::model::PriceBar;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Trading days per year used for annualisation
pub const TRADING_DAYS: f64 = 252.0;
/// Annual risk-free rate used in the Sharpe ratio
pub const RISK_FREE_RATE: f64 = 0.04;

/// Lookback windows in trading days
const WINDOW_1M: usize = 21;
const WINDOW_3M: usize = 63;
const WINDOW_6M: usize = 126;
const WINDOW_1Y: usize = 252;
const WINDOW_3Y: usize = 756;
const WINDOW_5Y: usize = 1260;

/// Returns are fractions (0.12 = 12%)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub avg_daily_return: Option<f64>,
    pub daily_volatility: Option<f64>,
    pub annualized_volatility: Option<f64>,
    pub return_1m: Option<f64>,
    pub return_3m: Option<f64>,
    pub return_6m: Option<f64>,
    pub return_1y: Option<f64>,
    pub return_3y: Option<f64>,
    pub cagr_3y: Option<f64>,
    pub return_5y: Option<f64>,
    pub cagr_5y: Option<f64>,
    pub return_ytd: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio_1y: Option<f64>,
}

/// Day-over-day fractional changes; the first bar has none
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect()
}

/// Compute return metrics from bars ordered oldest first
///
/// `as_of` selects the calendar year for the YTD return.
pub fn calculate_return_metrics(prices: &[PriceBar], as_of: NaiveDate) -> ReturnMetrics {
    let closes: Vec<f64> = prices.iter().map(|b| b.close).collect();
    let mut metrics = ReturnMetrics::default();
    let Some(&last) = closes.last() else {
        return metrics;
    };

    let returns = daily_returns(&closes);
    metrics.avg_daily_return = mean(&returns);
    metrics.daily_volatility = sample_std(&returns);
    metrics.annualized_volatility = metrics.daily_volatility.map(|s| s * TRADING_DAYS.sqrt());

    let window = |n: usize| -> Option<f64> {
        let base = *closes.get(closes.len().checked_sub(n)?)?;
        (base != 0.0).then(|| last / base)
    };

    metrics.return_1m = window(WINDOW_1M).map(|r| r - 1.0);
    metrics.return_3m = window(WINDOW_3M).map(|r| r - 1.0);
    metrics.return_6m = window(WINDOW_6M).map(|r| r - 1.0);
    metrics.return_1y = window(WINDOW_1Y).map(|r| r - 1.0);
    if let Some(r) = window(WINDOW_3Y) {
        metrics.return_3y = Some(r - 1.0);
        metrics.cagr_3y = Some(r.powf(1.0 / 3.0) - 1.0);
    }
    if let Some(r) = window(WINDOW_5Y) {
        metrics.return_5y = Some(r - 1.0);
        metrics.cagr_5y = Some(r.powf(1.0 / 5.0) - 1.0);
    }

    let year = as_of.year();
    let mut this_year = prices.iter().filter(|b| b.date.year() == year);
    if let Some(first) = this_year.next() {
        let latest = this_year.last().unwrap_or(first);
        if first.close != 0.0 {
            metrics.return_ytd = Some(latest.close / first.close - 1.0);
        }
    }

    metrics.max_drawdown = max_drawdown(&closes);

    if let Some(vol) = metrics.annualized_volatility.filter(|v| *v > 0.0) {
        let excess = metrics.return_1y.unwrap_or(0.0) - RISK_FREE_RATE;
        metrics.sharpe_ratio_1y = Some(excess / vol);
    }

    metrics
}

/// Largest peak-to-trough decline as a negative fraction
pub fn max_drawdown(closes: &[f64]) -> Option<f64> {
    let mut peak = f64::MIN;
    let mut worst: Option<f64> = None;
    for &close in closes {
        peak = peak.max(close);
        if peak > 0.0 {
            let dd = (close - peak) / peak;
            worst = Some(worst.map_or(dd, |w| w.min(dd)));
        }
    }
    worst
}
