//! Moving averages, RSI and rolling volatility

use super::returns::{TRADING_DAYS, daily_returns};
use super::sample_std;
use crate::error::{ResearchError, Result};
use serde::{Deserialize, Serialize};
use ta::{
    Next,
    indicators::{RelativeStrengthIndex, SimpleMovingAverage},
};

pub const RSI_PERIOD: usize = 14;
pub const VOLATILITY_WINDOW: usize = 20;

/// Latest indicator readings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicators {
    pub ma_short: Option<f64>,
    pub ma_long: Option<f64>,
    pub rsi_14: Option<f64>,
    /// 20-day rolling standard deviation of daily returns, annualised
    pub volatility_20d: Option<f64>,
}

/// Simple moving average aligned with `closes`
///
/// Entries before the first full window are `None`.
pub fn moving_average(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>> {
    let mut sma =
        SimpleMovingAverage::new(period).map_err(|e| ResearchError::Indicator(e.to_string()))?;
    Ok(closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let value = sma.next(close);
            (i + 1 >= period).then_some(value)
        })
        .collect())
}

/// Relative strength index of the final bar
pub fn latest_rsi(closes: &[f64], period: usize) -> Result<Option<f64>> {
    if closes.len() <= period {
        return Ok(None);
    }
    let mut rsi = RelativeStrengthIndex::new(period)
        .map_err(|e| ResearchError::Indicator(e.to_string()))?;
    let mut last = None;
    for &close in closes {
        last = Some(rsi.next(close));
    }
    Ok(last)
}

/// Annualised volatility over the trailing `window` daily returns
pub fn rolling_volatility(closes: &[f64], window: usize) -> Option<f64> {
    let returns = daily_returns(closes);
    if returns.len() < window {
        return None;
    }
    sample_std(&returns[returns.len() - window..]).map(|s| s * TRADING_DAYS.sqrt())
}

/// Compute all indicators for closes ordered oldest first
pub fn calculate_indicators(
    closes: &[f64],
    ma_short: usize,
    ma_long: usize,
) -> Result<TechnicalIndicators> {
    let last = |series: Vec<Option<f64>>| series.last().copied().flatten();
    Ok(TechnicalIndicators {
        ma_short: last(moving_average(closes, ma_short)?),
        ma_long: last(moving_average(closes, ma_long)?),
        rsi_14: latest_rsi(closes, RSI_PERIOD)?,
        volatility_20d: rolling_volatility(closes, VOLATILITY_WINDOW),
    })
}

/// Short interpretation of an RSI reading
pub fn interpret_rsi(rsi: f64) -> &'static str {
    if rsi > 70.0 {
        "Overbought"
    } else if rsi < 30.0 {
        "Oversold"
    } else {
        "Neutral"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_alignment() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ma = moving_average(&closes, 3).unwrap();
        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert!((ma[2].unwrap() - 2.0).abs() < 1e-12);
        assert!((ma[4].unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_series_indicators() {
        let closes = vec![50.0; 250];
        let ind = calculate_indicators(&closes, 50, 200).unwrap();
        assert!((ind.ma_short.unwrap() - 50.0).abs() < 1e-9);
        assert!((ind.ma_long.unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(ind.volatility_20d, Some(0.0));
    }

    #[test]
    fn test_short_history_yields_none() {
        let closes = vec![10.0; 30];
        let ind = calculate_indicators(&closes, 50, 200).unwrap();
        assert_eq!(ind.ma_short, None);
        assert_eq!(ind.ma_long, None);
        assert!(ind.rsi_14.is_some());
    }

    #[test]
    fn test_rsi_rising_series_is_overbought() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + f64::from(i)).collect();
        let rsi = latest_rsi(&closes, RSI_PERIOD).unwrap().unwrap();
        assert!(rsi > 70.0);
        assert_eq!(interpret_rsi(rsi), "Overbought");
    }

    #[test]
    fn test_invalid_period() {
        assert!(moving_average(&[1.0], 0).is_err());
    }
}
