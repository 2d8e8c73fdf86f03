//! Market data providers

pub mod alpha_vantage;
mod live;
mod provider;
pub mod yahoo;

pub use alpha_vantage::AlphaVantageClient;
pub use live::LiveProvider;
pub use provider::MarketDataProvider;
#[cfg(test)]
pub use provider::MockMarketDataProvider;
pub use yahoo::YahooFinanceClient;
