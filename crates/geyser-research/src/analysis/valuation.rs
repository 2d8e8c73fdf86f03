use crate::model::{CompanyOverview, FinancialStatements, KeyStatistics};
use serde::{Deserialize, Serialize};

/// Price multiples and yields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuationMetrics {
    pub pe_trailing: Option<f64>,
    pub pe_forward: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub ev_to_revenue: Option<f64>,
    pub price_to_fcf: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub earnings_yield: Option<f64>,
    pub fcf_yield: Option<f64>,
}

pub(super) fn calculate(
    overview: &CompanyOverview,
    stats: &KeyStatistics,
    statements: &FinancialStatements,
) -> ValuationMetrics {
    let mut metrics = ValuationMetrics {
        pe_trailing: stats.pe_trailing,
        pe_forward: stats.pe_forward,
        peg_ratio: stats.peg_ratio,
        price_to_book: stats.price_to_book,
        price_to_sales: stats.price_to_sales,
        ev_to_ebitda: stats.ev_to_ebitda,
        ev_to_revenue: stats.ev_to_revenue,
        dividend_yield: overview.dividend_yield,
        ..Default::default()
    };

    if let (Some(mcap), Some(fcf)) = (super::nonzero(overview.market_cap), stats.free_cash_flow) {
        if fcf > 0.0 {
            metrics.price_to_fcf = Some(mcap / fcf);
        }
    }

    if metrics.pe_trailing.is_none() {
        if let (Some(price), Some(eps)) = (super::nonzero(overview.current_price), stats.eps_trailing) {
            if eps > 0.0 {
                metrics.pe_trailing = Some(price / eps);
            }
        }
    }

    if metrics.ev_to_revenue.is_none() {
        let revenue = statements.latest_income().and_then(|i| i.total_revenue);
        metrics.ev_to_revenue = super::ratio(overview.enterprise_value, revenue);
    }

    metrics.earnings_yield = metrics.pe_trailing.filter(|pe| *pe > 0.0).map(|pe| 1.0 / pe);
    metrics.fcf_yield = metrics.price_to_fcf.filter(|p| *p > 0.0).map(|p| 1.0 / p);

    metrics
}
