//! Shared utilities for geyser
//!
//! This crate provides common functionality used across the geyser workspace,
//! including logging setup and helpers for reading settings from the environment.

pub mod config;
pub mod env;
pub mod logging;

pub use config::{LogLevel, LoggingConfig, ParseLevelError};
pub use env::parse_bool;
pub use logging::init_tracing;
