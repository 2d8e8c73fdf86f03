//! Financial ratio calculator
//!
//! Every metric is optional: a missing input yields `None`, never an error.
//! Records are produced once per ticker and not mutated afterwards.

mod efficiency;
mod growth;
mod health;
mod profitability;
pub mod returns;
pub mod technical;
mod valuation;

pub use efficiency::EfficiencyMetrics;
pub use growth::{GrowthMetrics, MetricHistory};
pub use health::HealthMetrics;
pub use profitability::{MarginTrends, ProfitabilityMetrics};
pub use returns::{ReturnMetrics, calculate_return_metrics};
pub use technical::{TechnicalIndicators, calculate_indicators};
pub use valuation::ValuationMetrics;

use crate::collector::CompanyData;
use serde::{Deserialize, Serialize};

/// Price position and trend readings used by the report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceMetrics {
    pub current_price: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub pct_from_52w_high: Option<f64>,
    pub pct_from_52w_low: Option<f64>,
    pub fifty_day_avg: Option<f64>,
    pub two_hundred_day_avg: Option<f64>,
    pub beta: Option<f64>,
    pub rsi_14: Option<f64>,
    pub volatility_20d: Option<f64>,
}

/// All ratio categories for one company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialAnalysis {
    pub ticker: String,
    pub valuation: ValuationMetrics,
    pub profitability: ProfitabilityMetrics,
    pub growth: GrowthMetrics,
    pub health: HealthMetrics,
    pub efficiency: EfficiencyMetrics,
    pub returns: ReturnMetrics,
    pub price: PriceMetrics,
}

/// Run every calculator over collected company data
pub fn analyze(data: &CompanyData) -> FinancialAnalysis {
    tracing::info!("Running financial analysis for {}", data.ticker);

    let overview = &data.overview;
    let analysis = FinancialAnalysis {
        ticker: data.ticker.clone(),
        valuation: valuation::calculate(overview, &data.statistics, &data.statements),
        profitability: profitability::calculate(&data.statistics, &data.statements),
        growth: growth::calculate(&data.statistics, &data.statements),
        health: health::calculate(overview, &data.statistics, &data.statements),
        efficiency: efficiency::calculate(&data.statements),
        returns: data.returns.clone(),
        price: PriceMetrics {
            current_price: overview.current_price,
            fifty_two_week_high: overview.fifty_two_week_high,
            fifty_two_week_low: overview.fifty_two_week_low,
            pct_from_52w_high: overview.pct_from_52w_high,
            pct_from_52w_low: overview.pct_from_52w_low,
            fifty_day_avg: overview.fifty_day_avg,
            two_hundred_day_avg: overview.two_hundred_day_avg,
            beta: data.statistics.beta,
            rsi_14: data.technicals.rsi_14,
            volatility_20d: data.technicals.volatility_20d,
        },
    };

    tracing::debug!(
        "Analysis for {}: P/E {:?}, ROIC {:?}, Z {:?}",
        data.ticker,
        analysis.valuation.pe_trailing,
        analysis.profitability.roic,
        analysis.health.altman_z_score
    );
    analysis
}

/// Reference date for calendar windows: the latest bar's date
pub fn analysis_date(prices: &[crate::model::PriceBar]) -> Option<chrono::NaiveDate> {
    prices.last().map(|bar| bar.date)
}

/// Treat zero as absent, the way the ratio guards read
pub(crate) fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Divide when both operands are present and non-zero
pub(crate) fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    Some(nonzero(numerator)? / nonzero(denominator)?)
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator)
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BalanceSheet, CashFlowStatement, IncomeStatement};

    #[test]
    fn test_helpers() {
        assert_eq!(nonzero(Some(0.0)), None);
        assert_eq!(ratio(Some(10.0), Some(4.0)), Some(2.5));
        assert_eq!(ratio(Some(10.0), Some(0.0)), None);
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[1.0]), None);
        assert!((sample_std(&[2.0, 4.0]).unwrap() - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_analyze_empty_data() {
        let analysis = analyze(&CompanyData::empty("NVDA"));
        assert_eq!(analysis.ticker, "NVDA");
        assert_eq!(analysis.valuation.pe_trailing, None);
        assert_eq!(analysis.health.altman_z_score, None);
        assert_eq!(analysis.efficiency, EfficiencyMetrics::default());
    }

    #[test]
    fn test_analyze_populated_data() {
        let mut data = CompanyData::empty("TEST");
        data.overview.market_cap = Some(1_000.0);
        data.overview.current_price = Some(50.0);
        data.statistics.eps_trailing = Some(5.0);
        data.statistics.free_cash_flow = Some(50.0);
        data.statements.income.push(IncomeStatement {
            total_revenue: Some(500.0),
            operating_income: Some(100.0),
            net_income: Some(80.0),
            ..Default::default()
        });
        data.statements.balance.push(BalanceSheet {
            total_assets: Some(1_000.0),
            stockholders_equity: Some(600.0),
            total_debt: Some(200.0),
            cash_and_equivalents: Some(100.0),
            ..Default::default()
        });
        data.statements.cash_flow.push(CashFlowStatement {
            free_cash_flow: Some(50.0),
            ..Default::default()
        });

        let analysis = analyze(&data);
        assert_eq!(analysis.valuation.pe_trailing, Some(10.0));
        assert_eq!(analysis.valuation.price_to_fcf, Some(20.0));
        assert!(analysis.profitability.roic.is_some());
        assert!(analysis.health.altman_z_score.is_some());
        assert_eq!(analysis.efficiency.asset_turnover, Some(0.5));
    }
}
