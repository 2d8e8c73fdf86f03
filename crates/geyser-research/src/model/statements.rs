use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One annual income statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub period_end: Option<NaiveDate>,
    pub total_revenue: Option<f64>,
    pub cost_of_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub ebit: Option<f64>,
    pub ebitda: Option<f64>,
    pub pretax_income: Option<f64>,
    pub tax_provision: Option<f64>,
    pub interest_expense: Option<f64>,
    pub net_income: Option<f64>,
    pub basic_eps: Option<f64>,
    pub diluted_eps: Option<f64>,
}

impl IncomeStatement {
    /// Basic EPS, else diluted
    pub fn eps(&self) -> Option<f64> {
        self.basic_eps.or(self.diluted_eps)
    }
}

/// One annual balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub period_end: Option<NaiveDate>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub stockholders_equity: Option<f64>,
    /// Equity including minority interest, used when the above is absent
    pub total_equity_gross: Option<f64>,
    pub total_debt: Option<f64>,
    pub long_term_debt: Option<f64>,
    pub cash_and_equivalents: Option<f64>,
    pub short_term_investments: Option<f64>,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub inventory: Option<f64>,
    pub accounts_receivable: Option<f64>,
    pub accounts_payable: Option<f64>,
}

impl BalanceSheet {
    pub fn equity(&self) -> Option<f64> {
        self.stockholders_equity.or(self.total_equity_gross)
    }
}

/// One annual cash flow statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashFlowStatement {
    pub period_end: Option<NaiveDate>,
    pub operating_cash_flow: Option<f64>,
    pub capital_expenditure: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub depreciation_and_amortization: Option<f64>,
}

/// Annual statements, most recent period first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income: Vec<IncomeStatement>,
    pub balance: Vec<BalanceSheet>,
    pub cash_flow: Vec<CashFlowStatement>,
}

impl FinancialStatements {
    pub fn latest_income(&self) -> Option<&IncomeStatement> {
        self.income.first()
    }

    pub fn latest_balance(&self) -> Option<&BalanceSheet> {
        self.balance.first()
    }

    pub fn latest_cash_flow(&self) -> Option<&CashFlowStatement> {
        self.cash_flow.first()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.balance.is_empty() && self.cash_flow.is_empty()
    }

    /// Keep at most `years` periods of each statement
    pub fn truncate(&mut self, years: usize) {
        self.income.truncate(years);
        self.balance.truncate(years);
        self.cash_flow.truncate(years);
    }
}

/// Label for a fiscal period column
pub(crate) fn period_label(period_end: Option<NaiveDate>) -> String {
    period_end.map_or_else(|| "N/A".to_string(), |d| d.year().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eps_fallback() {
        let stmt = IncomeStatement {
            diluted_eps: Some(2.5),
            ..Default::default()
        };
        assert_eq!(stmt.eps(), Some(2.5));

        let stmt = IncomeStatement {
            basic_eps: Some(2.6),
            diluted_eps: Some(2.5),
            ..Default::default()
        };
        assert_eq!(stmt.eps(), Some(2.6));
    }

    #[test]
    fn test_equity_fallback() {
        let sheet = BalanceSheet {
            total_equity_gross: Some(100.0),
            ..Default::default()
        };
        assert_eq!(sheet.equity(), Some(100.0));
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(NaiveDate::from_ymd_opt(2024, 1, 28)), "2024");
        assert_eq!(period_label(None), "N/A");
    }
}
