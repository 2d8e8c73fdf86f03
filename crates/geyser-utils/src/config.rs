//! Logging configuration shared by the library and the binary

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Verbosity accepted on the command line and in config files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "WARN")]
    Warning,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Returned when a level name is not one of DEBUG, INFO, WARNING or ERROR
#[derive(Debug, Clone, Error)]
#[error("unknown log level '{0}' (expected DEBUG, INFO, WARNING or ERROR)")]
pub struct ParseLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Where log output goes and how verbose it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level; `RUST_LOG` overrides it when set
    pub level: LogLevel,
    /// Optional log file, written without ANSI colours
    pub file: Option<PathBuf>,
    /// Emit human-readable output to stderr
    pub console: bool,
    /// Write the log file as JSON lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: Some(PathBuf::from("output/analysis.log")),
            console: true,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert_eq!(" Error ".parse::<LogLevel>().unwrap(), LogLevel::Error);
        assert!("TRACE".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_level_filter_directive() {
        assert_eq!(LogLevel::Warning.as_filter(), "warn");
        assert_eq!(LogLevel::Warning.to_string(), "WARNING");
    }

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.console);
        assert!(!config.json);
        assert_eq!(config.file, Some(PathBuf::from("output/analysis.log")));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LoggingConfig = toml::from_str("level = \"WARNING\"\njson = true").unwrap();
        assert_eq!(config.level, LogLevel::Warning);
        assert!(config.json);
        assert!(config.console);
    }
}
