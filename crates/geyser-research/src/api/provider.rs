use crate::error::Result;
use crate::model::{
    AnalystCoverage, CompanyProfile, EarningsSurprise, FinancialStatements, InsiderTransaction,
    PriceBar,
};
use async_trait::async_trait;

/// Source of company fundamentals and market data
///
/// Implementations return whatever the upstream provides; absent fields stay
/// `None`. Errors mean the request itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Overview and key statistics
    async fn company_profile(&self, ticker: &str) -> Result<CompanyProfile>;

    /// Daily bars covering the last `years`, oldest first
    async fn price_history(&self, ticker: &str, years: u32) -> Result<Vec<PriceBar>>;

    /// Annual statements, most recent first
    async fn financial_statements(&self, ticker: &str) -> Result<FinancialStatements>;

    async fn analyst_coverage(&self, ticker: &str) -> Result<AnalystCoverage>;

    /// Quarterly EPS surprises, most recent first
    async fn earnings_history(&self, ticker: &str) -> Result<Vec<EarningsSurprise>>;

    async fn insider_transactions(&self, ticker: &str) -> Result<Vec<InsiderTransaction>>;
}
