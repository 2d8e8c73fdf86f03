use crate::analysis::mean;
use crate::model::EarningsSurprise;
use serde::{Deserialize, Serialize};

/// Surprises within this band (percent) count as a meet
const MEET_BAND: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EarningsOutcome {
    Beat,
    Meet,
    Miss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterResult {
    pub actual: f64,
    pub estimate: f64,
    pub surprise_pct: f64,
    pub outcome: EarningsOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EarningsSentiment {
    pub has_data: bool,
    pub quarters_analyzed: usize,
    pub beat_count: usize,
    pub meet_count: usize,
    pub miss_count: usize,
    /// Beats over all reported quarters
    pub beat_rate: Option<f64>,
    pub avg_surprise_pct: Option<f64>,
    /// Most recent first
    pub quarters: Vec<QuarterResult>,
    pub trend: Option<String>,
}

/// Percent surprise; zero when the estimate is zero
pub fn surprise_pct(actual: f64, estimate: f64) -> f64 {
    if estimate == 0.0 {
        0.0
    } else {
        (actual - estimate) / estimate.abs() * 100.0
    }
}

pub(super) fn analyze(history: &[EarningsSurprise]) -> EarningsSentiment {
    let mut result = EarningsSentiment {
        has_data: !history.is_empty(),
        quarters_analyzed: history.len(),
        ..Default::default()
    };

    for row in history {
        let (Some(actual), Some(estimate)) = (row.reported_eps, row.estimated_eps) else {
            continue;
        };
        let surprise = surprise_pct(actual, estimate);
        let outcome = if surprise > MEET_BAND {
            result.beat_count += 1;
            EarningsOutcome::Beat
        } else if surprise < -MEET_BAND {
            result.miss_count += 1;
            EarningsOutcome::Miss
        } else {
            result.meet_count += 1;
            EarningsOutcome::Meet
        };
        result.quarters.push(QuarterResult {
            actual,
            estimate,
            surprise_pct: surprise,
            outcome,
        });
    }

    let surprises: Vec<f64> = result.quarters.iter().map(|q| q.surprise_pct).collect();
    if let Some(avg) = mean(&surprises) {
        result.avg_surprise_pct = Some(avg);
        result.beat_rate = Some(result.beat_count as f64 / result.quarters_analyzed as f64);

        if surprises.len() >= 4 {
            let (recent, older) = (mean(&surprises[..2]), mean(&surprises[2..4]));
            let trend = match recent.partial_cmp(&older) {
                Some(std::cmp::Ordering::Greater) => "Improving",
                Some(std::cmp::Ordering::Less) => "Deteriorating",
                _ => "Stable",
            };
            result.trend = Some(trend.to_string());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter(actual: Option<f64>, estimate: Option<f64>) -> EarningsSurprise {
        EarningsSurprise {
            period_end: None,
            reported_eps: actual,
            estimated_eps: estimate,
        }
    }

    #[test]
    fn test_surprise_pct() {
        assert!((surprise_pct(1.1, 1.0) - 10.0).abs() < 1e-9);
        assert!((surprise_pct(-0.5, -1.0) - 50.0).abs() < 1e-12);
        assert_eq!(surprise_pct(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_beat_rate_and_trend() {
        let history = vec![
            quarter(Some(1.2), Some(1.0)),   // +20%
            quarter(Some(1.1), Some(1.0)),   // +10%
            quarter(Some(1.0), Some(1.0)),   // meet
            quarter(Some(0.9), Some(1.0)),   // -10%
            quarter(None, Some(1.0)),        // skipped, still counted
        ];
        let result = analyze(&history);
        assert_eq!(result.quarters_analyzed, 5);
        assert_eq!((result.beat_count, result.meet_count, result.miss_count), (2, 1, 1));
        assert_eq!(result.beat_rate, Some(0.4));
        assert!((result.avg_surprise_pct.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(result.trend.as_deref(), Some("Improving"));
    }

    #[test]
    fn test_empty_history() {
        let result = analyze(&[]);
        assert!(!result.has_data);
        assert_eq!(result.beat_rate, None);
        assert_eq!(result.trend, None);
    }
}
