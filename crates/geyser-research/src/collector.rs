//! Data collection for a target company and its peers

use crate::analysis::{
    ReturnMetrics, TechnicalIndicators, analysis_date, calculate_indicators,
    calculate_return_metrics,
};
use crate::api::MarketDataProvider;
use crate::config::ResearchConfig;
use crate::error::Result;
use crate::model::{
    AnalystCoverage, CompanyOverview, EarningsSurprise, FinancialStatements, InsiderTransaction,
    KeyStatistics, PriceBar,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bars in a trading year, for 52-week extremes
const YEAR_BARS: usize = 252;
/// Bars averaged for the average-volume fallback
const VOLUME_BARS: usize = 63;

/// Everything collected for one ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyData {
    pub ticker: String,
    pub overview: CompanyOverview,
    pub statistics: KeyStatistics,
    /// Daily bars, oldest first
    pub prices: Vec<PriceBar>,
    pub returns: ReturnMetrics,
    pub technicals: TechnicalIndicators,
    pub statements: FinancialStatements,
    pub analyst: AnalystCoverage,
    /// Most recent first
    pub earnings: Vec<EarningsSurprise>,
    pub insiders: Vec<InsiderTransaction>,
}

impl CompanyData {
    /// No data beyond the ticker
    pub fn empty(ticker: impl Into<String>) -> Self {
        let ticker = ticker.into();
        Self {
            overview: CompanyOverview {
                ticker: ticker.clone(),
                ..Default::default()
            },
            ticker,
            ..Default::default()
        }
    }

    pub fn closes(&self) -> Vec<f64> {
        self.prices.iter().map(|b| b.close).collect()
    }
}

/// Log and discard a failure in an optional section
fn or_empty<T: Default>(ticker: &str, section: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Could not fetch {} for {}: {}", section, ticker, e);
        T::default()
    })
}

/// Collects and enriches provider data
#[derive(Clone)]
pub struct DataCollector {
    provider: Arc<dyn MarketDataProvider>,
    years_of_history: u32,
    years_of_financials: usize,
    ma_short: usize,
    ma_long: usize,
}

impl DataCollector {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &ResearchConfig) -> Self {
        Self {
            provider,
            years_of_history: config.years_of_history,
            years_of_financials: config.years_of_financials,
            ma_short: config.ma_short,
            ma_long: config.ma_long,
        }
    }

    /// Collect every section for the target company
    ///
    /// Only the profile is required; other sections degrade to empty with a
    /// warning.
    pub async fn collect(&self, ticker: &str) -> Result<CompanyData> {
        tracing::info!("Collecting data for {}", ticker);
        let profile = self.provider.company_profile(ticker).await?;

        let (prices, statements, analyst, earnings, insiders) = tokio::join!(
            self.provider.price_history(ticker, self.years_of_history),
            self.provider.financial_statements(ticker),
            self.provider.analyst_coverage(ticker),
            self.provider.earnings_history(ticker),
            self.provider.insider_transactions(ticker),
        );

        let mut statements = or_empty(ticker, "financial statements", statements);
        statements.truncate(self.years_of_financials);

        let mut data = CompanyData {
            ticker: ticker.to_string(),
            overview: profile.overview,
            statistics: profile.statistics,
            prices: or_empty(ticker, "price history", prices),
            statements,
            analyst: or_empty(ticker, "analyst coverage", analyst),
            earnings: or_empty(ticker, "earnings history", earnings),
            insiders: or_empty(ticker, "insider transactions", insiders),
            ..Default::default()
        };
        self.enrich(&mut data)?;

        tracing::info!(
            "Data collection complete for {} ({} bars, {} annual statements)",
            ticker,
            data.prices.len(),
            data.statements.income.len()
        );
        Ok(data)
    }

    /// Overview, statistics and returns for a peer
    pub async fn collect_peer(&self, ticker: &str) -> Result<CompanyData> {
        let profile = self.provider.company_profile(ticker).await?;
        let prices = or_empty(
            ticker,
            "price history",
            self.provider.price_history(ticker, self.years_of_history).await,
        );

        let mut data = CompanyData {
            ticker: ticker.to_string(),
            overview: profile.overview,
            statistics: profile.statistics,
            prices,
            ..Default::default()
        };
        self.enrich(&mut data)?;
        Ok(data)
    }

    /// Derive returns and technicals, then fill gaps the provider left
    fn enrich(&self, data: &mut CompanyData) -> Result<()> {
        let closes = data.closes();
        if let Some(as_of) = analysis_date(&data.prices) {
            data.returns = calculate_return_metrics(&data.prices, as_of);
        }
        data.technicals = calculate_indicators(&closes, self.ma_short, self.ma_long)?;

        fill_overview(&mut data.overview, &data.prices, &data.technicals, &data.statements);
        fill_statistics(&mut data.statistics, &data.overview, &data.statements);
        data.overview.refresh_52_week_position();

        if data.analyst.price_targets.current_price.is_none() {
            data.analyst.price_targets.current_price = data.overview.current_price;
        }
        Ok(())
    }
}

fn fill_overview(
    overview: &mut CompanyOverview,
    prices: &[PriceBar],
    technicals: &TechnicalIndicators,
    statements: &FinancialStatements,
) {
    if let Some(last) = prices.last() {
        overview.current_price = overview.current_price.or(Some(last.close));
    }
    if prices.len() >= 2 {
        overview.previous_close = overview
            .previous_close
            .or(Some(prices[prices.len() - 2].close));
    }

    let year = &prices[prices.len().saturating_sub(YEAR_BARS)..];
    if !year.is_empty() {
        let high = year.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let low = year.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        overview.fifty_two_week_high = overview.fifty_two_week_high.or(Some(high));
        overview.fifty_two_week_low = overview.fifty_two_week_low.or(Some(low));

        let recent = &prices[prices.len().saturating_sub(VOLUME_BARS)..];
        let volume = recent.iter().map(|b| b.volume as f64).sum::<f64>() / recent.len() as f64;
        overview.avg_volume = overview.avg_volume.or(Some(volume));
    }

    overview.fifty_day_avg = overview.fifty_day_avg.or(technicals.ma_short);
    overview.two_hundred_day_avg = overview.two_hundred_day_avg.or(technicals.ma_long);

    if overview.market_cap.is_none() {
        if let (Some(price), Some(shares)) = (overview.current_price, overview.shares_outstanding) {
            overview.market_cap = Some(price * shares);
        }
    }

    if overview.enterprise_value.is_none() {
        if let (Some(mcap), Some(balance)) = (overview.market_cap, statements.latest_balance()) {
            let debt = balance.total_debt.unwrap_or(0.0);
            let cash = balance.cash_and_equivalents.unwrap_or(0.0);
            overview.enterprise_value = Some(mcap + debt - cash);
        }
    }
}

fn fill_statistics(
    stats: &mut KeyStatistics,
    overview: &CompanyOverview,
    statements: &FinancialStatements,
) {
    use crate::analysis::ratio;

    if let Some(income) = statements.latest_income() {
        let revenue = income.total_revenue;
        stats.gross_margin = stats.gross_margin.or_else(|| ratio(income.gross_profit, revenue));
        stats.operating_margin = stats
            .operating_margin
            .or_else(|| ratio(income.operating_income, revenue));
        stats.profit_margin = stats.profit_margin.or_else(|| ratio(income.net_income, revenue));
        stats.eps_trailing = stats.eps_trailing.or(income.eps());
        stats.price_to_sales = stats
            .price_to_sales
            .or_else(|| ratio(overview.market_cap, revenue));
        stats.ev_to_ebitda = stats
            .ev_to_ebitda
            .or_else(|| ratio(overview.enterprise_value, income.ebitda));

        if let Some(balance) = statements.latest_balance() {
            stats.roe = stats.roe.or_else(|| ratio(income.net_income, balance.equity()));
            stats.roa = stats.roa.or_else(|| ratio(income.net_income, balance.total_assets));
        }
    }

    if let Some(balance) = statements.latest_balance() {
        stats.current_ratio = stats
            .current_ratio
            .or_else(|| ratio(balance.current_assets, balance.current_liabilities));
        stats.quick_ratio = stats.quick_ratio.or_else(|| {
            let quick = balance.current_assets? - balance.inventory.unwrap_or(0.0);
            ratio(Some(quick), balance.current_liabilities)
        });
        stats.debt_to_equity = stats
            .debt_to_equity
            .or_else(|| ratio(balance.total_debt, balance.equity()).map(|r| r * 100.0));
        stats.price_to_book = stats
            .price_to_book
            .or_else(|| ratio(overview.market_cap, balance.equity()));
    }

    if let Some(cash_flow) = statements.latest_cash_flow() {
        stats.operating_cash_flow = stats.operating_cash_flow.or(cash_flow.operating_cash_flow);
        stats.free_cash_flow = stats.free_cash_flow.or(cash_flow.free_cash_flow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataProvider;
    use crate::error::ResearchError;
    use crate::model::{BalanceSheet, CashFlowStatement, CompanyProfile, IncomeStatement};
    use chrono::NaiveDate;

    fn bars(n: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000,
                }
            })
            .collect()
    }

    fn statements() -> FinancialStatements {
        FinancialStatements {
            income: vec![IncomeStatement {
                total_revenue: Some(1_000.0),
                gross_profit: Some(600.0),
                net_income: Some(100.0),
                ..Default::default()
            }],
            balance: vec![BalanceSheet {
                stockholders_equity: Some(500.0),
                total_debt: Some(250.0),
                cash_and_equivalents: Some(50.0),
                current_assets: Some(400.0),
                current_liabilities: Some(200.0),
                ..Default::default()
            }],
            cash_flow: vec![CashFlowStatement {
                free_cash_flow: Some(80.0),
                ..Default::default()
            }],
        }
    }

    fn mock_provider() -> MockMarketDataProvider {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_company_profile().returning(|ticker| {
            Ok(CompanyProfile {
                overview: CompanyOverview {
                    ticker: ticker.to_string(),
                    shares_outstanding: Some(10.0),
                    ..Default::default()
                },
                ..Default::default()
            })
        });
        provider.expect_price_history().returning(|_, _| Ok(bars(260)));
        provider
            .expect_financial_statements()
            .returning(|_| Ok(statements()));
        provider
            .expect_analyst_coverage()
            .returning(|_| Err(ResearchError::AlphaVantage("down".to_string())));
        provider.expect_earnings_history().returning(|_| Ok(Vec::new()));
        provider
            .expect_insider_transactions()
            .returning(|_| Ok(Vec::new()));
        provider
    }

    #[tokio::test]
    async fn test_collect_enriches_gaps() {
        let collector = DataCollector::new(Arc::new(mock_provider()), &ResearchConfig::default());
        let data = collector.collect("TEST").await.unwrap();

        assert_eq!(data.prices.len(), 260);
        assert_eq!(data.overview.current_price, Some(359.0));
        assert_eq!(data.overview.market_cap, Some(3_590.0));
        assert_eq!(data.overview.enterprise_value, Some(3_790.0));
        assert_eq!(data.overview.fifty_two_week_high, Some(360.0));
        assert!(data.overview.pct_from_52w_high.is_some());
        assert!(data.overview.fifty_day_avg.is_some());
        assert_eq!(data.statistics.current_ratio, Some(2.0));
        assert_eq!(data.statistics.debt_to_equity, Some(50.0));
        assert_eq!(data.statistics.gross_margin, Some(0.6));
        assert_eq!(data.statistics.free_cash_flow, Some(80.0));
        assert!(data.returns.return_1y.is_some());
        // Failed optional section degrades to empty
        assert_eq!(data.analyst.recommendations, None);
        assert_eq!(data.analyst.price_targets.current_price, Some(359.0));
    }

    #[tokio::test]
    async fn test_profile_failure_aborts() {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_company_profile()
            .returning(|t| Err(ResearchError::collection(t, "not found")));
        let collector = DataCollector::new(Arc::new(provider), &ResearchConfig::default());
        assert!(matches!(
            collector.collect("ZZZZ").await,
            Err(ResearchError::DataCollection { .. })
        ));
    }

    #[tokio::test]
    async fn test_collect_peer_skips_statements() {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_company_profile().returning(|ticker| {
            Ok(CompanyProfile {
                overview: CompanyOverview {
                    ticker: ticker.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            })
        });
        provider.expect_price_history().returning(|_, _| Ok(bars(30)));
        provider.expect_financial_statements().never();

        let collector = DataCollector::new(Arc::new(provider), &ResearchConfig::default());
        let data = collector.collect_peer("AMD").await.unwrap();
        assert_eq!(data.ticker, "AMD");
        assert!(data.returns.return_1m.is_some());
        assert!(data.statements.is_empty());
    }
}
