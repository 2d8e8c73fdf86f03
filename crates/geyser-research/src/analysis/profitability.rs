use super::{nonzero, ratio};
use crate::model::{FinancialStatements, KeyStatistics, period_label};
use serde::{Deserialize, Serialize};

/// Statutory rate assumed when the effective rate cannot be derived
const DEFAULT_TAX_RATE: f64 = 0.21;
const TREND_YEARS: usize = 4;

/// Margin series, oldest statement last (same order as the statements)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarginTrends {
    pub years: Vec<String>,
    pub gross_margin: Vec<Option<f64>>,
    pub operating_margin: Vec<Option<f64>>,
    pub net_margin: Vec<Option<f64>>,
}

impl MarginTrends {
    /// Whether the latest operating margin exceeds the prior year's
    pub fn operating_margin_expanding(&self) -> bool {
        match (self.operating_margin.first(), self.operating_margin.get(1)) {
            (Some(Some(latest)), Some(Some(prior))) => latest > prior,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitabilityMetrics {
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub net_margin: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub roic: Option<f64>,
    pub nopat: Option<f64>,
    pub invested_capital: Option<f64>,
    pub margin_trends: MarginTrends,
}

pub(super) fn calculate(stats: &KeyStatistics, statements: &FinancialStatements) -> ProfitabilityMetrics {
    let mut metrics = ProfitabilityMetrics {
        gross_margin: stats.gross_margin,
        operating_margin: stats.operating_margin,
        net_margin: stats.profit_margin,
        roe: stats.roe,
        roa: stats.roa,
        margin_trends: margin_trends(statements),
        ..Default::default()
    };

    let income = statements.latest_income();
    let balance = statements.latest_balance();

    let operating_income = income.and_then(|i| i.operating_income);
    let tax_rate = match ratio(
        income.and_then(|i| i.tax_provision),
        income.and_then(|i| i.pretax_income),
    ) {
        Some(rate) => rate.clamp(0.0, 0.5),
        None => DEFAULT_TAX_RATE,
    };

    if let Some(op_income) = nonzero(operating_income) {
        let nopat = op_income * (1.0 - tax_rate);
        metrics.nopat = Some(nopat);

        if let Some(equity) = balance.and_then(|b| b.equity()) {
            let debt = balance.and_then(|b| b.total_debt).unwrap_or(0.0);
            let cash = balance.and_then(|b| b.cash_and_equivalents).unwrap_or(0.0);
            let invested = equity + debt - cash;
            if invested > 0.0 {
                metrics.roic = Some(nopat / invested);
                metrics.invested_capital = Some(invested);
            }
        }
    }

    metrics
}

fn margin_trends(statements: &FinancialStatements) -> MarginTrends {
    let mut trends = MarginTrends::default();
    for income in statements.income.iter().take(TREND_YEARS) {
        trends.years.push(period_label(income.period_end));
        trends.gross_margin.push(ratio(income.gross_profit, income.total_revenue));
        trends.operating_margin.push(ratio(income.operating_income, income.total_revenue));
        trends.net_margin.push(ratio(income.net_income, income.total_revenue));
    }
    trends
}
