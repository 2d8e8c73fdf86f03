use super::alpha_vantage::{self, AlphaVantageClient, Function};
use super::provider::MarketDataProvider;
use super::yahoo::YahooFinanceClient;
use crate::cache::{CacheKey, CacheManager};
use crate::config::ProviderConfig;
use crate::error::{ResearchError, Result};
use crate::model::{
    AnalystCoverage, CompanyOverview, CompanyProfile, EarningsSurprise, FinancialStatements,
    InsiderTransaction, PriceBar,
};
use async_trait::async_trait;
use serde_json::Value;

/// Yahoo prices plus Alpha Vantage fundamentals, cached
///
/// Raw Alpha Vantage payloads are cached per endpoint, so the overview feeds
/// both the profile and analyst coverage with one request. Without an API key
/// only prices are available and the profile carries the ticker alone.
pub struct LiveProvider {
    yahoo: YahooFinanceClient,
    alpha_vantage: Option<AlphaVantageClient>,
    cache: CacheManager,
}

impl LiveProvider {
    pub fn new(config: &ProviderConfig, cache: CacheManager) -> Result<Self> {
        let alpha_vantage = match &config.alpha_vantage_api_key {
            Some(key) => Some(AlphaVantageClient::new(
                key.clone(),
                config.alpha_vantage_rate_limit,
                config.request_timeout(),
            )?),
            None => {
                tracing::warn!(
                    "ALPHA_VANTAGE_API_KEY not set; fundamentals, analyst and insider data unavailable"
                );
                None
            }
        };

        Ok(Self {
            yahoo: YahooFinanceClient::new(),
            alpha_vantage,
            cache,
        })
    }

    pub fn has_fundamentals(&self) -> bool {
        self.alpha_vantage.is_some()
    }

    fn client(&self) -> Result<&AlphaVantageClient> {
        self.alpha_vantage.as_ref().ok_or_else(|| {
            ResearchError::Config("ALPHA_VANTAGE_API_KEY is required for fundamentals".to_string())
        })
    }

    async fn raw(&self, function: Function, ticker: &str) -> Result<Value> {
        let client = self.client()?;
        let key = CacheKey::new(ticker, function.as_str().to_lowercase(), ());
        self.cache
            .fundamentals
            .get_or_fetch(key, || client.query(function, ticker))
            .await
    }
}

#[async_trait]
impl MarketDataProvider for LiveProvider {
    async fn company_profile(&self, ticker: &str) -> Result<CompanyProfile> {
        if !self.has_fundamentals() {
            return Ok(CompanyProfile {
                overview: CompanyOverview {
                    ticker: ticker.to_string(),
                    ..Default::default()
                },
                ..Default::default()
            });
        }
        let data = self.raw(Function::Overview, ticker).await?;
        if data.get("Symbol").is_none() {
            return Err(ResearchError::collection(ticker, "no overview returned"));
        }
        Ok(alpha_vantage::parse_profile(ticker, &data))
    }

    async fn price_history(&self, ticker: &str, years: u32) -> Result<Vec<PriceBar>> {
        let key = CacheKey::new(ticker, "prices", serde_json::json!({ "years": years }));
        self.cache
            .prices
            .get_or_fetch_typed(key, || self.yahoo.price_history(ticker, years))
            .await
    }

    async fn financial_statements(&self, ticker: &str) -> Result<FinancialStatements> {
        let income = self.raw(Function::IncomeStatement, ticker).await?;
        let balance = self.raw(Function::BalanceSheet, ticker).await?;
        let cash_flow = self.raw(Function::CashFlow, ticker).await?;
        let earnings = match self.raw(Function::Earnings, ticker).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Annual EPS unavailable for {}: {}", ticker, e);
                None
            }
        };
        Ok(alpha_vantage::parse_statements(
            &income,
            &balance,
            &cash_flow,
            earnings.as_ref(),
        ))
    }

    async fn analyst_coverage(&self, ticker: &str) -> Result<AnalystCoverage> {
        let data = self.raw(Function::Overview, ticker).await?;
        Ok(alpha_vantage::parse_analyst(&data))
    }

    async fn earnings_history(&self, ticker: &str) -> Result<Vec<EarningsSurprise>> {
        let data = self.raw(Function::Earnings, ticker).await?;
        Ok(alpha_vantage::parse_earnings(&data))
    }

    async fn insider_transactions(&self, ticker: &str) -> Result<Vec<InsiderTransaction>> {
        let data = self.raw(Function::InsiderTransactions, ticker).await?;
        Ok(alpha_vantage::parse_insiders(&data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyless() -> LiveProvider {
        LiveProvider::new(&ProviderConfig::default(), CacheManager::disabled()).unwrap()
    }

    #[tokio::test]
    async fn test_keyless_profile_degrades() {
        let provider = keyless();
        assert!(!provider.has_fundamentals());
        let profile = provider.company_profile("NVDA").await.unwrap();
        assert_eq!(profile.overview.ticker, "NVDA");
        assert_eq!(profile.overview.market_cap, None);
    }

    #[tokio::test]
    async fn test_keyless_fundamentals_error() {
        let provider = keyless();
        assert!(matches!(
            provider.financial_statements("NVDA").await,
            Err(ResearchError::Config(_))
        ));
    }
}
