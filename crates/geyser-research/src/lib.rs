//! Equity research engine
//!
//! Given a ticker this crate collects market and fundamental data, computes
//! financial ratios, compares the company with its industry peers, scores
//! sentiment and momentum, and produces a weighted recommendation with a
//! markdown report and Vega-Lite charts.
//!
//! - Data from Yahoo Finance (prices) and Alpha Vantage (fundamentals,
//!   analyst, earnings, insider activity), cached in memory and on disk
//! - Ratio analysis: valuation, profitability, growth, health, efficiency
//! - Peer comparison matrix with relative valuation and justification
//! - Six-category scoring engine with configurable weights and thresholds
//!
//! # Example
//!
//! ```rust,ignore
//! use geyser_research::{CacheManager, LiveProvider, NoopObserver, ResearchConfig, ResearchPipeline};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ResearchConfig::builder().build()?;
//!     let cache = CacheManager::from_config(&config.cache);
//!     let provider = Arc::new(LiveProvider::new(&config.provider, cache)?);
//!
//!     let outcome = ResearchPipeline::new(provider, config)
//!         .run("NVDA", &NoopObserver)
//!         .await?;
//!     println!("{}: {}", outcome.ticker, outcome.scores.recommendation);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod cache;
pub mod charts;
pub mod collector;
pub mod config;
pub mod error;
pub mod model;
pub mod peers;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod sentiment;
pub mod thesis;
pub mod validation;

// Re-export main types for convenience
pub use analysis::FinancialAnalysis;
pub use api::{LiveProvider, MarketDataProvider};
pub use cache::CacheManager;
pub use collector::{CompanyData, DataCollector};
pub use config::{ChartFormat, ResearchConfig, ResearchConfigBuilder};
pub use error::{ResearchError, Result};
pub use peers::{PeerComparator, PeerSummary};
pub use pipeline::{NoopObserver, PipelineObserver, ResearchOutcome, ResearchPipeline, Stage};
pub use report::ReportComposer;
pub use scoring::{Recommendation, ScoreReport, ScoringConfig, ScoringEngine};
pub use sentiment::SentimentSummary;
pub use thesis::InvestmentThesis;
