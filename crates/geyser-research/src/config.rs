//! Run configuration
//!
//! A [`ResearchConfig`] is assembled once at start-up and then passed by
//! reference to every stage. Layers are applied in increasing priority:
//! defaults, a TOML file, `GEYSER_*` environment variables, then explicit
//! builder calls (the CLI flags).

use crate::error::{ResearchError, Result};
use crate::scoring::ScoringConfig;
use geyser_utils::{LogLevel, LoggingConfig, parse_bool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Output format for chart files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    /// Standalone page embedding the chart with vega-embed
    #[default]
    Html,
    /// Raw Vega-Lite specification
    Json,
}

impl ChartFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ChartFormat {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(ResearchError::Config(format!(
                "unknown chart format '{other}' (expected html or json)"
            ))),
        }
    }
}

/// Cache behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory holding the on-disk JSON entries
    pub dir: PathBuf,
    /// Lifetime of fundamentals, statements and analyst data
    pub ttl_hours: u64,
    /// Lifetime of price history
    pub price_ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".cache"),
            ttl_hours: 24,
            price_ttl_hours: 1,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours * 3600)
    }

    pub fn price_ttl(&self) -> Duration {
        Duration::from_secs(self.price_ttl_hours * 3600)
    }
}

/// Data provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Alpha Vantage API key, required for fundamentals
    pub alpha_vantage_api_key: Option<String>,
    /// Maximum Alpha Vantage requests per minute (free tier: 5)
    pub alpha_vantage_rate_limit: u32,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            alpha_vantage_rate_limit: 5,
            request_timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Peer comparison settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Fetch peers concurrently
    pub parallel_fetch: bool,
    /// Upper bound on concurrent peer fetches
    pub max_workers: usize,
    /// Explicit peer list; overrides the built-in mapping when non-empty
    pub custom: Vec<String>,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            parallel_fetch: true,
            max_workers: 5,
            custom: Vec::new(),
        }
    }
}

/// Complete configuration for a research run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    pub default_ticker: String,
    /// Years of daily price history to fetch
    pub years_of_history: u32,
    /// Annual statement columns used for trends
    pub years_of_financials: usize,
    /// Years of prices shown in the price chart
    pub chart_price_years: u32,
    pub ma_short: usize,
    pub ma_long: usize,
    pub output_dir: PathBuf,
    pub charts_dir: PathBuf,
    pub charts_enabled: bool,
    pub chart_format: ChartFormat,
    /// Directory of user templates overriding the built-in report sections
    pub template_dir: Option<PathBuf>,
    pub cache: CacheConfig,
    pub provider: ProviderConfig,
    pub peers: PeerConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            default_ticker: "NVDA".to_string(),
            years_of_history: 5,
            years_of_financials: 4,
            chart_price_years: 2,
            ma_short: 50,
            ma_long: 200,
            output_dir: PathBuf::from("output"),
            charts_dir: PathBuf::from("output/charts"),
            charts_enabled: true,
            chart_format: ChartFormat::Html,
            template_dir: None,
            cache: CacheConfig::default(),
            provider: ProviderConfig::default(),
            peers: PeerConfig::default(),
            scoring: ScoringConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ResearchConfig {
    /// Create a new configuration builder starting from defaults
    pub fn builder() -> ResearchConfigBuilder {
        ResearchConfigBuilder::new(Self::default())
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ResearchError::Config(format!("invalid config file: {e}")))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResearchError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize back to TOML, e.g. to write a starter config
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ResearchError::Config(format!("failed to serialize config: {e}")))
    }

    /// Path of the markdown report for a ticker
    pub fn report_path(&self, ticker: &str) -> PathBuf {
        self.output_dir.join(format!("{ticker}_research_report.md"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;

        if self.years_of_history == 0 {
            return Err(ResearchError::Config(
                "years_of_history must be greater than 0".to_string(),
            ));
        }
        if self.ma_short == 0 || self.ma_short >= self.ma_long {
            return Err(ResearchError::Config(format!(
                "ma_short ({}) must be positive and less than ma_long ({})",
                self.ma_short, self.ma_long
            )));
        }
        if self.peers.max_workers == 0 {
            return Err(ResearchError::Config(
                "max_workers must be greater than 0".to_string(),
            ));
        }
        if self.provider.alpha_vantage_rate_limit == 0 {
            return Err(ResearchError::Config(
                "alpha_vantage_rate_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ResearchConfig`]
#[derive(Debug, Clone)]
pub struct ResearchConfigBuilder {
    config: ResearchConfig,
}

impl ResearchConfigBuilder {
    /// Start from an existing configuration, typically one read from a file
    pub fn new(base: ResearchConfig) -> Self {
        Self { config: base }
    }

    /// Override fields from environment variables
    ///
    /// `lookup` maps a variable name to its value; pass
    /// [`geyser_utils::env::process_env`] for the real environment.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let c = &mut self.config;

        if let Some(v) = lookup("GEYSER_DEFAULT_TICKER") {
            c.default_ticker = v;
        }
        if let Some(v) = lookup("GEYSER_YEARS_OF_HISTORY") {
            c.years_of_history = parse_number("GEYSER_YEARS_OF_HISTORY", &v)?;
        }
        if let Some(v) = lookup("GEYSER_YEARS_OF_FINANCIALS") {
            c.years_of_financials = parse_number("GEYSER_YEARS_OF_FINANCIALS", &v)?;
        }
        if let Some(v) = lookup("GEYSER_OUTPUT_DIR") {
            c.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("GEYSER_CHARTS_DIR") {
            c.charts_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("GEYSER_CHART_FORMAT") {
            c.chart_format = v.parse()?;
        }
        if let Some(v) = lookup("GEYSER_TEMPLATE_DIR") {
            c.template_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("GEYSER_CACHE_ENABLED") {
            c.cache.enabled = parse_bool(&v);
        }
        if let Some(v) = lookup("GEYSER_CACHE_DIR") {
            c.cache.dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("GEYSER_CACHE_TTL_HOURS") {
            c.cache.ttl_hours = parse_number("GEYSER_CACHE_TTL_HOURS", &v)?;
        }
        if let Some(v) = lookup("GEYSER_CACHE_PRICE_TTL_HOURS") {
            c.cache.price_ttl_hours = parse_number("GEYSER_CACHE_PRICE_TTL_HOURS", &v)?;
        }
        if let Some(v) = lookup("GEYSER_PARALLEL_PEER_FETCH") {
            c.peers.parallel_fetch = parse_bool(&v);
        }
        if let Some(v) = lookup("GEYSER_MAX_WORKERS") {
            c.peers.max_workers = parse_number("GEYSER_MAX_WORKERS", &v)?;
        }
        if let Some(v) = lookup("ALPHA_VANTAGE_API_KEY") {
            if !v.trim().is_empty() {
                c.provider.alpha_vantage_api_key = Some(v.trim().to_string());
            }
        }
        if let Some(v) = lookup("GEYSER_LOG_LEVEL") {
            c.logging.level = v
                .parse::<LogLevel>()
                .map_err(|e| ResearchError::Config(e.to_string()))?;
        }
        if let Some(v) = lookup("GEYSER_LOG_FILE") {
            c.logging.file = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("GEYSER_LOG_TO_CONSOLE") {
            c.logging.console = parse_bool(&v);
        }

        Ok(self)
    }

    /// Set the output directory; the charts directory follows it
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.config.charts_dir = dir.join("charts");
        self.config.logging.file = Some(dir.join("analysis.log"));
        self.config.output_dir = dir;
        self
    }

    /// Enable or disable chart generation
    pub fn charts_enabled(mut self, enabled: bool) -> Self {
        self.config.charts_enabled = enabled;
        self
    }

    /// Set the chart file format
    pub fn chart_format(mut self, format: ChartFormat) -> Self {
        self.config.chart_format = format;
        self
    }

    /// Enable or disable the cache
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache.enabled = enabled;
        self
    }

    /// Use an explicit peer list
    pub fn custom_peers<I, S>(mut self, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.peers.custom = peers.into_iter().map(Into::into).collect();
        self
    }

    /// Set the minimum log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Enable or disable console logging
    pub fn log_to_console(mut self, enabled: bool) -> Self {
        self.config.logging.console = enabled;
        self
    }

    /// Set scoring weights and thresholds
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.config.scoring = scoring;
        self
    }

    /// Set the Alpha Vantage API key
    pub fn alpha_vantage_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.provider.alpha_vantage_api_key = Some(key.into());
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<ResearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ResearchError::Config(format!("{key} must be a number, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ResearchConfig::default();
        assert_eq!(config.default_ticker, "NVDA");
        assert_eq!(config.years_of_history, 5);
        assert_eq!(config.cache.ttl(), Duration::from_secs(24 * 3600));
        assert_eq!(config.cache.price_ttl(), Duration::from_secs(3600));
        assert_eq!(config.peers.max_workers, 5);
        assert_eq!(config.chart_format, ChartFormat::Html);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_layer_keeps_defaults() {
        let config = ResearchConfig::from_toml_str(
            r#"
default_ticker = "AAPL"
chart_format = "json"

[cache]
ttl_hours = 6

[scoring.weights]
valuation = 0.30
growth = 0.15
"#,
        )
        .unwrap();

        assert_eq!(config.default_ticker, "AAPL");
        assert_eq!(config.chart_format, ChartFormat::Json);
        assert_eq!(config.cache.ttl_hours, 6);
        assert!(config.cache.enabled);
        assert_eq!(config.scoring.weights.valuation, 0.30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            ResearchConfig::from_toml_str("years_of_history = \"many\""),
            Err(ResearchError::Config(_))
        ));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geyser.toml");
        let mut original = ResearchConfig::default();
        original.default_ticker = "MSFT".to_string();
        std::fs::write(&path, original.to_toml_string().unwrap()).unwrap();

        let loaded = ResearchConfig::from_file(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_env_layer() {
        let config = ResearchConfig::builder()
            .apply_env(env(&[
                ("GEYSER_DEFAULT_TICKER", "AMD"),
                ("GEYSER_CACHE_ENABLED", "no"),
                ("GEYSER_MAX_WORKERS", "3"),
                ("GEYSER_LOG_LEVEL", "debug"),
                ("ALPHA_VANTAGE_API_KEY", " demo "),
            ]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.default_ticker, "AMD");
        assert!(!config.cache.enabled);
        assert_eq!(config.peers.max_workers, 3);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.provider.alpha_vantage_api_key.as_deref(), Some("demo"));
    }

    #[test]
    fn test_env_rejects_bad_number() {
        let result = ResearchConfig::builder().apply_env(env(&[("GEYSER_MAX_WORKERS", "lots")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = ResearchConfig::builder()
            .apply_env(env(&[("GEYSER_OUTPUT_DIR", "from-env")]))
            .unwrap()
            .output_dir("reports")
            .charts_enabled(false)
            .cache_enabled(false)
            .custom_peers(["amd", "intc"])
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.charts_dir, PathBuf::from("reports/charts"));
        assert_eq!(
            config.logging.file,
            Some(PathBuf::from("reports/analysis.log"))
        );
        assert!(!config.charts_enabled);
        assert_eq!(config.peers.custom, vec!["amd", "intc"]);
        assert_eq!(
            config.report_path("NVDA"),
            PathBuf::from("reports/NVDA_research_report.md")
        );
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ResearchConfig::default();
        config.ma_short = 250;
        assert!(config.validate().is_err());

        let mut config = ResearchConfig::default();
        config.peers.max_workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chart_format_parse() {
        assert_eq!("HTML".parse::<ChartFormat>().unwrap(), ChartFormat::Html);
        assert_eq!(ChartFormat::Json.extension(), "json");
        assert!("png".parse::<ChartFormat>().is_err());
    }
}
