use super::{nonzero, ratio};
use crate::model::{CompanyOverview, FinancialStatements, KeyStatistics};
use serde::{Deserialize, Serialize};

/// Liquidity, leverage and solvency
///
/// `debt_to_equity` keeps the provider's percent units; `debt_to_equity_calc`
/// is a plain ratio from the balance sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub net_debt: Option<f64>,
    pub cash_position: Option<f64>,
    pub debt_to_assets: Option<f64>,
    pub debt_to_equity_calc: Option<f64>,
    pub equity_ratio: Option<f64>,
    pub interest_coverage: Option<f64>,
    pub debt_to_ebitda: Option<f64>,
    pub altman_z_score: Option<f64>,
}

pub(super) fn calculate(
    overview: &CompanyOverview,
    stats: &KeyStatistics,
    statements: &FinancialStatements,
) -> HealthMetrics {
    let mut metrics = HealthMetrics {
        current_ratio: stats.current_ratio,
        quick_ratio: stats.quick_ratio,
        debt_to_equity: stats.debt_to_equity,
        ..Default::default()
    };

    if let Some(balance) = statements.latest_balance() {
        let debt = balance.total_debt;
        let equity = balance.equity();
        let sti = balance.short_term_investments.unwrap_or(0.0);

        if let (Some(debt), Some(cash)) = (debt, balance.cash_and_equivalents) {
            metrics.net_debt = Some(debt - cash - sti);
            metrics.cash_position = Some(cash + sti);
        }
        metrics.debt_to_assets = ratio(debt, balance.total_assets);
        metrics.debt_to_equity_calc = ratio(debt, equity);
        metrics.equity_ratio = ratio(equity, balance.total_assets);
    }

    if let Some(income) = statements.latest_income() {
        let operating_income = income.operating_income.or(income.ebit);
        if let (Some(op), Some(interest)) =
            (nonzero(operating_income), income.interest_expense.filter(|i| *i > 0.0))
        {
            metrics.interest_coverage = Some(op / interest);
        }

        let ebitda = income.ebitda.or_else(|| {
            let da = statements
                .latest_cash_flow()
                .and_then(|c| c.depreciation_and_amortization);
            Some(nonzero(income.operating_income)? + nonzero(da)?)
        });
        metrics.debt_to_ebitda = ratio(statements.latest_balance().and_then(|b| b.total_debt), ebitda);
    }

    metrics.altman_z_score = altman_z_score(overview, statements);
    metrics
}

/// Z = 1.2A + 1.4B + 3.3C + 0.6D + 1.0E
///
/// A working capital, B retained earnings, C EBIT and E sales are each scaled
/// by total assets; D is market cap over total liabilities. Missing components
/// count as zero.
pub(super) fn altman_z_score(
    overview: &CompanyOverview,
    statements: &FinancialStatements,
) -> Option<f64> {
    let balance = statements.latest_balance()?;
    let income = statements.latest_income()?;
    let assets = nonzero(balance.total_assets)?;

    let working_capital =
        balance.current_assets.unwrap_or(0.0) - balance.current_liabilities.unwrap_or(0.0);
    let a = working_capital / assets;
    let b = nonzero(balance.retained_earnings).map_or(0.0, |r| r / assets);
    let c = nonzero(income.operating_income).map_or(0.0, |e| e / assets);
    let d = ratio(overview.market_cap, balance.total_liabilities).unwrap_or(0.0);
    let e = nonzero(income.total_revenue).map_or(0.0, |r| r / assets);

    Some(1.2 * a + 1.4 * b + 3.3 * c + 0.6 * d + e)
}
