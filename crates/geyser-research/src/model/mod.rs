//! Typed records for provider data
//!
//! Every numeric field a provider may omit is an `Option<f64>`; a missing
//! value is never an error.

mod company;
mod market;
mod statements;

pub use company::{CompanyOverview, CompanyProfile, KeyStatistics};
pub use market::{
    AnalystCoverage, EarningsSurprise, InsiderTransaction, PriceBar, PriceTargets,
    RecommendationBreakdown, TransactionKind,
};
pub use statements::{BalanceSheet, CashFlowStatement, FinancialStatements, IncomeStatement};
pub(crate) use statements::period_label;
