//! Command-line arguments and their mapping onto the run configuration

use anyhow::Context;
use clap::Parser;
use geyser_research::{ChartFormat, ResearchConfig, ResearchConfigBuilder};
use geyser_utils::LogLevel;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  geyser NVDA                      Analyze NVIDIA
  geyser AAPL --no-cache           Analyze Apple without cache
  geyser MSFT --config custom.toml Use a custom config file
  geyser GOOGL --log-level DEBUG   Enable debug logging
  geyser TSLA --no-charts          Skip chart generation
  geyser AMD --peers NVDA,INTC     Compare against an explicit peer set
  geyser --clear-cache             Clear cache and exit";

#[derive(Parser, Debug)]
#[command(name = "geyser", version)]
#[command(about = "Generate comprehensive equity research reports", after_help = EXAMPLES)]
pub struct Args {
    /// Stock ticker symbol (defaults to the configured default ticker)
    pub ticker: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable caching (fetch fresh data)
    #[arg(long)]
    pub no_cache: bool,

    /// Clear all cached data and exit
    #[arg(long)]
    pub clear_cache: bool,

    /// Logging level: DEBUG, INFO, WARNING or ERROR
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Skip chart generation
    #[arg(long)]
    pub no_charts: bool,

    /// Chart output format: html or json
    #[arg(long, value_name = "FORMAT")]
    pub chart_format: Option<ChartFormat>,

    /// Output directory for the report, charts and log file
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Comma-separated peer tickers, replacing the built-in peer mapping
    #[arg(long, value_name = "A,B,C", value_delimiter = ',')]
    pub peers: Vec<String>,

    /// Verbose output (equivalent to --log-level DEBUG)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (minimal output); wins over --verbose
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Effective log level after -q and -v
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            Some(LogLevel::Error)
        } else if self.verbose {
            Some(LogLevel::Debug)
        } else {
            self.log_level
        }
    }

    /// Layer file, environment and flags into a validated configuration
    pub fn build_config<F>(&self, env: F) -> anyhow::Result<ResearchConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match &self.config {
            Some(path) => ResearchConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => ResearchConfig::default(),
        };

        let mut builder = ResearchConfigBuilder::new(base).apply_env(env)?;

        if let Some(dir) = &self.output_dir {
            builder = builder.output_dir(dir);
        }
        if self.no_cache {
            builder = builder.cache_enabled(false);
        }
        if self.no_charts {
            builder = builder.charts_enabled(false);
        }
        if let Some(format) = self.chart_format {
            builder = builder.chart_format(format);
        }
        let peers: Vec<String> = self
            .peers
            .iter()
            .map(|p| p.trim().to_uppercase())
            .filter(|p| !p.is_empty())
            .collect();
        if !peers.is_empty() {
            builder = builder.custom_peers(peers);
        }
        if let Some(level) = self.effective_log_level() {
            builder = builder.log_level(level);
        }
        if self.quiet {
            builder = builder.log_to_console(false);
        }

        Ok(builder.build()?)
    }

    /// Ticker from the command line, else the configured default
    pub fn ticker_or(&self, config: &ResearchConfig) -> String {
        self.ticker
            .clone()
            .unwrap_or_else(|| config.default_ticker.clone())
    }
}
