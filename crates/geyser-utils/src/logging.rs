//! Logging and tracing utilities

use crate::config::LoggingConfig;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `config.level`. The console layer writes to
/// stderr so report output on stdout stays clean; the file layer, when a path is
/// configured, appends plain text or JSON lines.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .boxed(),
        );
    }

    if let Some(path) = &config.file {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create log directory {}", parent.display())
                })?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
        layers.push(if config.json { layer.json().boxed() } else { layer.boxed() });
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
