//! End-to-end research run
//!
//! [`ResearchPipeline::run`] drives the stages in order: collect, analyze,
//! compare peers, sentiment, visualize, report. Scoring and the thesis are
//! computed between sentiment and visualization since both the charts and
//! the report depend on them.

use crate::analysis::{FinancialAnalysis, analyze};
use crate::api::MarketDataProvider;
use crate::charts::{self, ChartSpec, ChartWriter};
use crate::collector::{CompanyData, DataCollector};
use crate::config::ResearchConfig;
use crate::error::Result;
use crate::peers::{PeerComparator, PeerSummary};
use crate::report::{ReportComposer, ReportInputs};
use crate::scoring::{ScoreReport, ScoringEngine, ScoringInputs};
use crate::sentiment::SentimentSummary;
use crate::thesis::{InvestmentThesis, ThesisComposer};
use crate::validation::{sanitize_ticker, validate_financial_data};
use chrono::Local;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Collect,
    Analyze,
    Peers,
    Sentiment,
    Charts,
    Report,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Collect,
        Stage::Analyze,
        Stage::Peers,
        Stage::Sentiment,
        Stage::Charts,
        Stage::Report,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Self::Collect => "Collecting data from Yahoo Finance",
            Self::Analyze => "Running financial analysis",
            Self::Peers => "Performing peer comparison",
            Self::Sentiment => "Analyzing sentiment and momentum",
            Self::Charts => "Generating visualizations",
            Self::Report => "Generating research report",
        }
    }

    /// 1-based position, for "[n/6]" style progress
    pub fn position(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).map_or(0, |i| i + 1)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Receives stage progress; the CLI drives a progress bar from it
pub trait PipelineObserver: Send + Sync {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_completed(&self, _stage: Stage) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct ResearchOutcome {
    pub ticker: String,
    pub data: CompanyData,
    pub analysis: FinancialAnalysis,
    pub peers: PeerSummary,
    pub sentiment: SentimentSummary,
    pub scores: ScoreReport,
    pub thesis: InvestmentThesis,
    pub report: String,
    pub report_path: PathBuf,
    /// Chart files written; empty when charts are disabled
    pub charts: Vec<PathBuf>,
}

/// Runs the research stages for one ticker
pub struct ResearchPipeline {
    provider: Arc<dyn MarketDataProvider>,
    config: ResearchConfig,
    data_sources: String,
}

impl ResearchPipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: ResearchConfig) -> Self {
        Self {
            provider,
            config,
            data_sources: "Yahoo Finance".to_string(),
        }
    }

    /// Attribution printed in the report disclaimer
    pub fn with_data_sources(mut self, sources: impl Into<String>) -> Self {
        self.data_sources = sources.into();
        self
    }

    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Run every stage and write the report
    ///
    /// Fails on an invalid ticker, when the target profile cannot be
    /// fetched, or when the report cannot be rendered or written. Chart
    /// failures are logged and skipped.
    pub async fn run(
        &self,
        ticker: &str,
        observer: &dyn PipelineObserver,
    ) -> Result<ResearchOutcome> {
        let ticker = sanitize_ticker(ticker)?;
        info!("Starting research for {}", ticker);
        let collector = DataCollector::new(Arc::clone(&self.provider), &self.config);

        observer.stage_started(Stage::Collect);
        let data = collector.collect(&ticker).await?;
        for warning in validate_financial_data(&data) {
            warn!("Data quality warning for {}: {}", ticker, warning);
        }
        observer.stage_completed(Stage::Collect);

        observer.stage_started(Stage::Analyze);
        let analysis = analyze(&data);
        observer.stage_completed(Stage::Analyze);

        observer.stage_started(Stage::Peers);
        let comparator = PeerComparator::new(collector, self.config.peers.clone());
        let peers = comparator.analyze(&data).await;
        debug!("Peer premium for {}: {:.1}%", ticker, peers.avg_premium());
        observer.stage_completed(Stage::Peers);

        observer.stage_started(Stage::Sentiment);
        let sentiment = SentimentSummary::analyze(&data);
        observer.stage_completed(Stage::Sentiment);

        let engine = ScoringEngine::new(self.config.scoring);
        let inputs = ScoringInputs::from_stages(&analysis, Some(&peers), Some(&sentiment));
        let scores = engine.score(&ticker, &inputs);
        let thesis = ThesisComposer {
            analysis: &analysis,
            scores: &scores,
            peers: Some(&peers),
            sentiment: Some(&sentiment),
            industry: data.overview.industry.as_deref(),
        }
        .compose();

        observer.stage_started(Stage::Charts);
        let charts = if self.config.charts_enabled {
            self.write_charts(&data, &analysis, &peers, &sentiment, &scores)
        } else {
            debug!("Chart generation disabled");
            Vec::new()
        };
        observer.stage_completed(Stage::Charts);

        observer.stage_started(Stage::Report);
        let composer = match &self.config.template_dir {
            Some(dir) => ReportComposer::with_overrides(dir)?,
            None => ReportComposer::new()?,
        };
        let report = composer.render(&ReportInputs {
            data: &data,
            analysis: &analysis,
            peers: Some(&peers),
            sentiment: &sentiment,
            scores: &scores,
            thesis: &thesis,
            thresholds: &self.config.scoring.thresholds,
            generated_on: Local::now().date_naive(),
            data_sources: self.data_sources.clone(),
        })?;
        let report_path = self.config.report_path(&ticker);
        ReportComposer::write(&report_path, &report)?;
        observer.stage_completed(Stage::Report);

        info!(
            "Research complete for {}: {} ({:.1}/10)",
            ticker, scores.recommendation, scores.total_score
        );

        Ok(ResearchOutcome {
            ticker,
            data,
            analysis,
            peers,
            sentiment,
            scores,
            thesis,
            report,
            report_path,
            charts,
        })
    }

    fn write_charts(
        &self,
        data: &CompanyData,
        analysis: &FinancialAnalysis,
        peers: &PeerSummary,
        sentiment: &SentimentSummary,
        scores: &ScoreReport,
    ) -> Vec<PathBuf> {
        let ticker = &data.ticker;
        let mut specs: Vec<ChartSpec> = Vec::new();

        match charts::price_chart(
            ticker,
            &data.prices,
            self.config.chart_price_years,
            self.config.ma_short,
            self.config.ma_long,
        ) {
            Ok(Some(spec)) => specs.push(spec),
            Ok(None) => debug!("No price history to chart for {}", ticker),
            Err(e) => warn!("Could not build price chart for {}: {}", ticker, e),
        }
        specs.extend(charts::financial_trends_chart(ticker, analysis));
        specs.extend(charts::margin_chart(ticker, analysis));
        specs.extend(charts::peer_valuation_chart(&peers.matrix));
        specs.extend(charts::growth_vs_valuation_chart(&peers.matrix));
        specs.push(charts::sentiment_gauge(
            ticker,
            sentiment.overall_score,
            &sentiment.overall_label,
        ));
        specs.push(charts::score_breakdown_chart(scores));

        let writer = ChartWriter::new(
            &self.config.charts_dir,
            ticker.as_str(),
            self.config.chart_format,
        );
        let written = writer.write_all(&specs);
        info!(
            "Saved {} of {} charts to {}",
            written.len(),
            specs.len(),
            writer.dir().display()
        );
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketDataProvider;
    use crate::config::ChartFormat;
    use crate::error::ResearchError;
    use crate::model::{CompanyOverview, CompanyProfile, KeyStatistics, PriceBar};
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    fn bars(n: usize) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                let close = 50.0 + i as f64 * 0.2;
                PriceBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 5_000,
                }
            })
            .collect()
    }

    fn provider() -> MockMarketDataProvider {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_company_profile().returning(|ticker| {
            Ok(CompanyProfile {
                overview: CompanyOverview {
                    ticker: ticker.to_string(),
                    name: Some(format!("{ticker} Inc")),
                    sector: Some("Technology".to_string()),
                    shares_outstanding: Some(1_000.0),
                    ..Default::default()
                },
                statistics: KeyStatistics {
                    pe_trailing: Some(if ticker == "MSFT" { 22.0 } else { 28.0 }),
                    ..Default::default()
                },
            })
        });
        provider.expect_price_history().returning(|_, _| Ok(bars(300)));
        provider
            .expect_financial_statements()
            .returning(|_| Ok(Default::default()));
        provider
            .expect_analyst_coverage()
            .returning(|_| Ok(Default::default()));
        provider.expect_earnings_history().returning(|_| Ok(Vec::new()));
        provider
            .expect_insider_transactions()
            .returning(|_| Ok(Vec::new()));
        provider
    }

    fn config(dir: &std::path::Path, charts: bool) -> ResearchConfig {
        ResearchConfig::builder()
            .output_dir(dir)
            .charts_enabled(charts)
            .chart_format(ChartFormat::Json)
            .custom_peers(["MSFT", "GOOGL"])
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(Stage, bool)>>);

    impl PipelineObserver for Recorder {
        fn stage_started(&self, stage: Stage) {
            self.0.lock().unwrap().push((stage, false));
        }
        fn stage_completed(&self, stage: Stage) {
            self.0.lock().unwrap().push((stage, true));
        }
    }

    #[test]
    fn test_stage_positions() {
        assert_eq!(Stage::Collect.position(), 1);
        assert_eq!(Stage::Report.position(), 6);
        assert_eq!(Stage::Peers.to_string(), "Performing peer comparison");
    }

    #[tokio::test]
    async fn test_run_writes_report_and_charts() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ResearchPipeline::new(Arc::new(provider()), config(dir.path(), true));
        let recorder = Recorder::default();

        let outcome = assert_ok!(pipeline.run(" aapl ", &recorder).await);

        assert_eq!(outcome.ticker, "AAPL");
        assert_eq!(outcome.peers.peers, vec!["MSFT", "GOOGL"]);
        assert!(outcome.report_path.ends_with("AAPL_research_report.md"));
        let written = std::fs::read_to_string(&outcome.report_path).unwrap();
        assert_eq!(written, outcome.report);
        assert!(written.contains("# AAPL Equity Research Report"));

        assert!(!outcome.charts.is_empty());
        assert!(outcome.charts.iter().all(|p| p.exists()));
        assert!(
            outcome
                .charts
                .iter()
                .any(|p| p.ends_with("AAPL_score_breakdown.json"))
        );

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.len(), Stage::ALL.len() * 2);
        assert_eq!(events.first(), Some(&(Stage::Collect, false)));
        assert_eq!(events.last(), Some(&(Stage::Report, true)));
    }

    #[tokio::test]
    async fn test_run_without_charts() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = ResearchPipeline::new(Arc::new(provider()), config(dir.path(), false))
            .with_data_sources("Unit test feed");

        let outcome = assert_ok!(pipeline.run("NVDA", &NoopObserver).await);
        assert!(outcome.charts.is_empty());
        assert!(outcome.report.contains("Unit test feed"));
        assert!(
            outcome
                .report
                .contains(outcome.scores.recommendation.as_str())
        );
    }

    #[tokio::test]
    async fn test_invalid_ticker_rejected_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = MockMarketDataProvider::new();
        provider.expect_company_profile().never();
        let pipeline = ResearchPipeline::new(Arc::new(provider), config(dir.path(), false));

        let err = assert_err!(pipeline.run("NOT A TICKER", &NoopObserver).await);
        assert!(matches!(err, ResearchError::InvalidTicker(_)));
    }

    #[tokio::test]
    async fn test_profile_failure_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_company_profile()
            .returning(|t| Err(ResearchError::collection(t, "not found")));
        let pipeline = ResearchPipeline::new(Arc::new(provider), config(dir.path(), false));

        let result = pipeline.run("ZZZZ", &NoopObserver).await;
        assert!(matches!(result, Err(ResearchError::DataCollection { .. })));
        assert!(!dir.path().join("ZZZZ_research_report.md").exists());
    }
}
