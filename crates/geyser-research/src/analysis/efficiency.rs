use super::nonzero;
use crate::model::FinancialStatements;
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: f64 = 365.0;

/// Turnover ratios and working-capital days
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyMetrics {
    pub asset_turnover: Option<f64>,
    pub inventory_turnover: Option<f64>,
    pub days_inventory: Option<f64>,
    pub receivables_turnover: Option<f64>,
    pub days_sales_outstanding: Option<f64>,
    pub payables_turnover: Option<f64>,
    pub days_payables_outstanding: Option<f64>,
    pub cash_conversion_cycle: Option<f64>,
}

/// Turnover and the matching days figure when the base is positive
fn turnover(flow: Option<f64>, base: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (nonzero(flow), base.filter(|b| *b > 0.0)) {
        (Some(flow), Some(base)) => {
            let turns = flow / base;
            (Some(turns), Some(DAYS_PER_YEAR / turns))
        }
        _ => (None, None),
    }
}

pub(super) fn calculate(statements: &FinancialStatements) -> EfficiencyMetrics {
    let (Some(income), Some(balance)) = (statements.latest_income(), statements.latest_balance())
    else {
        return EfficiencyMetrics::default();
    };

    let revenue = income.total_revenue;
    let cogs = income.cost_of_revenue;
    let mut metrics = EfficiencyMetrics {
        asset_turnover: super::ratio(revenue, balance.total_assets),
        ..Default::default()
    };

    (metrics.inventory_turnover, metrics.days_inventory) = turnover(cogs, balance.inventory);
    (metrics.receivables_turnover, metrics.days_sales_outstanding) =
        turnover(revenue, balance.accounts_receivable);
    (metrics.payables_turnover, metrics.days_payables_outstanding) =
        turnover(cogs, balance.accounts_payable);

    if let (Some(dio), Some(dso), Some(dpo)) = (
        metrics.days_inventory,
        metrics.days_sales_outstanding,
        metrics.days_payables_outstanding,
    ) {
        metrics.cash_conversion_cycle = Some(dio + dso - dpo);
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalanceSheet, IncomeStatement};

    #[test]
    fn test_cash_conversion_cycle() {
        let statements = FinancialStatements {
            income: vec![IncomeStatement {
                total_revenue: Some(3_650.0),
                cost_of_revenue: Some(1_825.0),
                ..Default::default()
            }],
            balance: vec![BalanceSheet {
                total_assets: Some(1_825.0),
                inventory: Some(250.0),
                accounts_receivable: Some(500.0),
                accounts_payable: Some(100.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let metrics = calculate(&statements);
        assert_eq!(metrics.asset_turnover, Some(2.0));
        assert!((metrics.days_inventory.unwrap() - 50.0).abs() < 1e-9);
        assert!((metrics.days_sales_outstanding.unwrap() - 50.0).abs() < 1e-9);
        assert!((metrics.days_payables_outstanding.unwrap() - 20.0).abs() < 1e-9);
        assert!((metrics.cash_conversion_cycle.unwrap() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_inventory_skips_cycle() {
        let statements = FinancialStatements {
            income: vec![IncomeStatement {
                total_revenue: Some(100.0),
                cost_of_revenue: Some(60.0),
                ..Default::default()
            }],
            balance: vec![BalanceSheet {
                accounts_receivable: Some(10.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let metrics = calculate(&statements);
        assert_eq!(metrics.inventory_turnover, None);
        assert!(metrics.days_sales_outstanding.is_some());
        assert_eq!(metrics.cash_conversion_cycle, None);
    }
}
