use super::nonzero;
use crate::model::{FinancialStatements, KeyStatistics, period_label};
use serde::{Deserialize, Serialize};

const HISTORY_YEARS: usize = 5;

/// A yearly series, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricHistory {
    pub years: Vec<String>,
    pub values: Vec<Option<f64>>,
}

impl MetricHistory {
    fn from_columns<T>(rows: &[T], value: impl Fn(&T) -> (String, Option<f64>)) -> Self {
        let mut history = Self::default();
        for row in rows.iter().take(HISTORY_YEARS).rev() {
            let (year, v) = value(row);
            history.years.push(year);
            history.values.push(v);
        }
        history
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    /// Provider-reported year-over-year figures
    pub revenue_growth_yoy: Option<f64>,
    pub earnings_growth_yoy: Option<f64>,
    pub earnings_growth_quarterly: Option<f64>,
    /// Computed from annual statements
    pub revenue_growth_1y: Option<f64>,
    pub revenue_cagr_3y: Option<f64>,
    pub eps_growth_1y: Option<f64>,
    pub eps_cagr_3y: Option<f64>,
    pub net_income_growth_1y: Option<f64>,
    pub fcf_growth_1y: Option<f64>,
    pub revenue_history: MetricHistory,
    pub net_income_history: MetricHistory,
    pub fcf_history: MetricHistory,
}

impl GrowthMetrics {
    /// Statement-derived revenue growth, falling back to the provider figure
    pub fn revenue_growth(&self) -> Option<f64> {
        nonzero(self.revenue_growth_1y).or(self.revenue_growth_yoy)
    }
}

fn growth(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    let prior = prior.filter(|p| *p > 0.0)?;
    Some(nonzero(current)? / prior - 1.0)
}

/// Undefined unless both endpoints are positive
fn cagr(current: Option<f64>, base: Option<f64>, years: f64) -> Option<f64> {
    let base = base.filter(|b| *b > 0.0)?;
    let current = current.filter(|c| *c > 0.0)?;
    Some((current / base).powf(1.0 / years) - 1.0)
}

pub(super) fn calculate(stats: &KeyStatistics, statements: &FinancialStatements) -> GrowthMetrics {
    let mut metrics = GrowthMetrics {
        revenue_growth_yoy: stats.revenue_growth,
        earnings_growth_yoy: stats.earnings_growth,
        earnings_growth_quarterly: stats.earnings_quarterly_growth,
        ..Default::default()
    };

    let income = &statements.income;
    if income.len() >= 2 {
        let revenue = |i: usize| income.get(i).and_then(|s| s.total_revenue);
        let eps = |i: usize| income.get(i).and_then(|s| s.eps());

        metrics.revenue_growth_1y = match (nonzero(revenue(0)), nonzero(revenue(1))) {
            (Some(current), Some(prior)) => Some(current / prior - 1.0),
            _ => None,
        };
        if income.len() > 3 {
            metrics.revenue_cagr_3y = cagr(revenue(0), revenue(3), 3.0);
            metrics.eps_cagr_3y = cagr(eps(0), eps(3), 3.0);
        }
        metrics.eps_growth_1y = growth(eps(0), eps(1));
        metrics.net_income_growth_1y = growth(income[0].net_income, income[1].net_income);
    }

    let cash_flow = &statements.cash_flow;
    if cash_flow.len() >= 2 {
        metrics.fcf_growth_1y = growth(cash_flow[0].free_cash_flow, cash_flow[1].free_cash_flow);
    }

    metrics.revenue_history = MetricHistory::from_columns(income, |s| {
        (period_label(s.period_end), s.total_revenue)
    });
    metrics.net_income_history =
        MetricHistory::from_columns(income, |s| (period_label(s.period_end), s.net_income));
    metrics.fcf_history = MetricHistory::from_columns(cash_flow, |s| {
        (period_label(s.period_end), s.free_cash_flow)
    });

    metrics
}
