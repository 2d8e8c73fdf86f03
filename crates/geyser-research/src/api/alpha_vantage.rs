//! Alpha Vantage fundamentals client
//!
//! Responses are kept as raw JSON so they can be cached verbatim; the
//! `parse_*` functions map them onto the typed model. Alpha Vantage encodes
//! numbers as strings and missing values as `"None"` or `"-"`.

use crate::error::{ResearchError, Result};
use crate::model::{
    AnalystCoverage, BalanceSheet, CashFlowStatement, CompanyOverview, CompanyProfile,
    EarningsSurprise, FinancialStatements, IncomeStatement, InsiderTransaction, KeyStatistics,
    PriceTargets, RecommendationBreakdown,
};
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Endpoints used by the research pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Overview,
    IncomeStatement,
    BalanceSheet,
    CashFlow,
    Earnings,
    InsiderTransactions,
}

impl Function {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "OVERVIEW",
            Self::IncomeStatement => "INCOME_STATEMENT",
            Self::BalanceSheet => "BALANCE_SHEET",
            Self::CashFlow => "CASH_FLOW",
            Self::Earnings => "EARNINGS",
            Self::InsiderTransactions => "INSIDER_TRANSACTIONS",
        }
    }
}

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl AlphaVantageClient {
    /// Create a client allowing `rate_limit` requests per minute
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Call one endpoint and return the raw JSON body
    pub async fn query(&self, function: Function, symbol: &str) -> Result<Value> {
        self.rate_limiter.until_ready().await;

        let mut params = HashMap::new();
        params.insert("function", function.as_str());
        params.insert("symbol", symbol);
        params.insert("apikey", &self.api_key);

        tracing::debug!("Alpha Vantage {} for {}", function.as_str(), symbol);
        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(ResearchError::AlphaVantage(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let data: Value = response.json().await?;
        check_response(&data)?;
        Ok(data)
    }
}

/// Map in-band error payloads onto errors
fn check_response(data: &Value) -> Result<()> {
    if let Some(error) = data.get("Error Message") {
        return Err(ResearchError::AlphaVantage(error.to_string()));
    }
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(ResearchError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
        });
    }
    Ok(())
}

fn num(data: &Value, key: &str) -> Option<f64> {
    let value = match data.get(key)? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Percent string ("4.25") as a fraction
fn pct(data: &Value, key: &str) -> Option<f64> {
    num(data, key).map(|v| v / 100.0)
}

fn text(data: &Value, key: &str) -> Option<String> {
    let s = data.get(key)?.as_str()?.trim();
    (!s.is_empty() && s != "None" && s != "-").then(|| s.to_string())
}

fn date(data: &Value, key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(data.get(key)?.as_str()?, "%Y-%m-%d").ok()
}

fn count(data: &Value, key: &str) -> u32 {
    num(data, key).map_or(0, |v| v.max(0.0) as u32)
}

fn reports<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// OVERVIEW → overview and key statistics
pub fn parse_profile(ticker: &str, data: &Value) -> CompanyProfile {
    let revenue_ttm = num(data, "RevenueTTM");
    let gross_profit_ttm = num(data, "GrossProfitTTM");

    let overview = CompanyOverview {
        ticker: ticker.to_string(),
        name: text(data, "Name"),
        sector: text(data, "Sector"),
        industry: text(data, "Industry"),
        country: text(data, "Country"),
        website: text(data, "OfficialSite"),
        employees: num(data, "FullTimeEmployees").map(|v| v as u64),
        description: text(data, "Description"),
        exchange: text(data, "Exchange"),
        market_cap: num(data, "MarketCapitalization"),
        shares_outstanding: num(data, "SharesOutstanding"),
        fifty_two_week_high: num(data, "52WeekHigh"),
        fifty_two_week_low: num(data, "52WeekLow"),
        fifty_day_avg: num(data, "50DayMovingAverage"),
        two_hundred_day_avg: num(data, "200DayMovingAverage"),
        dividend_rate: num(data, "DividendPerShare"),
        dividend_yield: num(data, "DividendYield"),
        ..Default::default()
    };

    let statistics = KeyStatistics {
        pe_trailing: num(data, "TrailingPE").or_else(|| num(data, "PERatio")),
        pe_forward: num(data, "ForwardPE"),
        peg_ratio: num(data, "PEGRatio"),
        price_to_book: num(data, "PriceToBookRatio"),
        price_to_sales: num(data, "PriceToSalesRatioTTM"),
        ev_to_ebitda: num(data, "EVToEBITDA"),
        ev_to_revenue: num(data, "EVToRevenue"),
        profit_margin: num(data, "ProfitMargin"),
        operating_margin: num(data, "OperatingMarginTTM"),
        gross_margin: match (gross_profit_ttm, revenue_ttm) {
            (Some(gp), Some(rev)) if rev != 0.0 => Some(gp / rev),
            _ => None,
        },
        roe: num(data, "ReturnOnEquityTTM"),
        roa: num(data, "ReturnOnAssetsTTM"),
        revenue_growth: num(data, "QuarterlyRevenueGrowthYOY"),
        earnings_growth: num(data, "QuarterlyEarningsGrowthYOY"),
        earnings_quarterly_growth: num(data, "QuarterlyEarningsGrowthYOY"),
        eps_trailing: num(data, "EPS").or_else(|| num(data, "DilutedEPSTTM")),
        book_value: num(data, "BookValue"),
        revenue_per_share: num(data, "RevenuePerShareTTM"),
        beta: num(data, "Beta"),
        institutional_ownership: pct(data, "PercentInstitutions"),
        insider_ownership: pct(data, "PercentInsiders"),
        ..Default::default()
    };

    CompanyProfile {
        overview,
        statistics,
    }
}

/// OVERVIEW → rating counts and consensus target
pub fn parse_analyst(data: &Value) -> AnalystCoverage {
    let breakdown = RecommendationBreakdown {
        strong_buy: count(data, "AnalystRatingStrongBuy"),
        buy: count(data, "AnalystRatingBuy"),
        hold: count(data, "AnalystRatingHold"),
        sell: count(data, "AnalystRatingSell"),
        strong_sell: count(data, "AnalystRatingStrongSell"),
    };
    let total = breakdown.total();

    AnalystCoverage {
        recommendations: (total > 0).then_some(breakdown),
        price_targets: PriceTargets {
            target_mean: num(data, "AnalystTargetPrice"),
            analyst_count: (total > 0).then_some(total),
            ..Default::default()
        },
    }
}

/// INCOME_STATEMENT, BALANCE_SHEET, CASH_FLOW and EARNINGS → annual statements
pub fn parse_statements(
    income: &Value,
    balance: &Value,
    cash_flow: &Value,
    earnings: Option<&Value>,
) -> FinancialStatements {
    let annual_eps: HashMap<NaiveDate, f64> = earnings
        .map(|e| reports(e, "annualEarnings"))
        .unwrap_or_default()
        .iter()
        .filter_map(|row| Some((date(row, "fiscalDateEnding")?, num(row, "reportedEPS")?)))
        .collect();

    let income = reports(income, "annualReports")
        .iter()
        .map(|row| {
            let period_end = date(row, "fiscalDateEnding");
            let eps = period_end.and_then(|d| annual_eps.get(&d).copied());
            IncomeStatement {
                period_end,
                total_revenue: num(row, "totalRevenue"),
                cost_of_revenue: num(row, "costOfRevenue"),
                gross_profit: num(row, "grossProfit"),
                operating_income: num(row, "operatingIncome"),
                ebit: num(row, "ebit"),
                ebitda: num(row, "ebitda"),
                pretax_income: num(row, "incomeBeforeTax"),
                tax_provision: num(row, "incomeTaxExpense"),
                interest_expense: num(row, "interestExpense"),
                net_income: num(row, "netIncome"),
                basic_eps: eps,
                diluted_eps: None,
            }
        })
        .collect();

    let balance = reports(balance, "annualReports")
        .iter()
        .map(|row| BalanceSheet {
            period_end: date(row, "fiscalDateEnding"),
            total_assets: num(row, "totalAssets"),
            total_liabilities: num(row, "totalLiabilities"),
            stockholders_equity: num(row, "totalShareholderEquity"),
            total_equity_gross: None,
            total_debt: num(row, "shortLongTermDebtTotal"),
            long_term_debt: num(row, "longTermDebt"),
            cash_and_equivalents: num(row, "cashAndCashEquivalentsAtCarryingValue"),
            short_term_investments: num(row, "shortTermInvestments"),
            current_assets: num(row, "totalCurrentAssets"),
            current_liabilities: num(row, "totalCurrentLiabilities"),
            retained_earnings: num(row, "retainedEarnings"),
            inventory: num(row, "inventory"),
            accounts_receivable: num(row, "currentNetReceivables"),
            accounts_payable: num(row, "currentAccountsPayable"),
        })
        .collect();

    let cash_flow = reports(cash_flow, "annualReports")
        .iter()
        .map(|row| {
            let operating = num(row, "operatingCashflow");
            let capex = num(row, "capitalExpenditures");
            CashFlowStatement {
                period_end: date(row, "fiscalDateEnding"),
                operating_cash_flow: operating,
                capital_expenditure: capex,
                // Capex is reported as a positive outflow
                free_cash_flow: operating.map(|ocf| ocf - capex.map_or(0.0, f64::abs)),
                depreciation_and_amortization: num(row, "depreciationDepletionAndAmortization"),
            }
        })
        .collect();

    FinancialStatements {
        income,
        balance,
        cash_flow,
    }
}

/// EARNINGS → quarterly surprises, most recent first
pub fn parse_earnings(data: &Value) -> Vec<EarningsSurprise> {
    reports(data, "quarterlyEarnings")
        .iter()
        .map(|row| EarningsSurprise {
            period_end: date(row, "fiscalDateEnding"),
            reported_eps: num(row, "reportedEPS"),
            estimated_eps: num(row, "estimatedEPS"),
        })
        .collect()
}

/// INSIDER_TRANSACTIONS → filings; `A` is an acquisition, `D` a disposal
pub fn parse_insiders(data: &Value) -> Vec<InsiderTransaction> {
    reports(data, "data")
        .iter()
        .map(|row| {
            let shares = num(row, "shares");
            let price = num(row, "share_price");
            let description = match text(row, "acquisition_or_disposal").as_deref() {
                Some("A") => "Purchase",
                Some("D") => "Sale",
                _ => "Other",
            };
            InsiderTransaction {
                date: date(row, "transaction_date"),
                insider: text_or_unknown(row, "executive"),
                position: text(row, "executive_title"),
                text: description.to_string(),
                shares,
                value: shares.zip(price).map(|(s, p)| s * p),
            }
        })
        .collect()
}

fn text_or_unknown(data: &Value, key: &str) -> String {
    text(data, key).unwrap_or_else(|| "Unknown".to_string())
}
