//! Command-line interface for geyser

mod cli;
mod progress;
mod summary;

use clap::Parser;
use cli::Args;
use geyser_research::cache::clear_dir;
use geyser_research::{CacheManager, LiveProvider, ResearchPipeline};
use geyser_utils::env::process_env;
use progress::StageProgress;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Analysis failed: {e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<ExitCode> {
    let config = args.build_config(process_env)?;
    geyser_utils::init_tracing(&config.logging)?;

    if args.clear_cache {
        info!("Clearing cache...");
        clear_dir(&config.cache.dir).await?;
        println!("Cache cleared successfully");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.quiet {
        summary::print_banner();
    }

    let ticker = args.ticker_or(&config);
    if !config.cache.enabled {
        info!("Caching disabled - fetching fresh data");
    }
    let cache = CacheManager::from_config(&config.cache);
    let provider = LiveProvider::new(&config.provider, cache)?;
    let sources = if provider.has_fundamentals() {
        "Yahoo Finance and Alpha Vantage"
    } else {
        "Yahoo Finance"
    };
    let pipeline = ResearchPipeline::new(Arc::new(provider), config).with_data_sources(sources);
    let progress = StageProgress::new(args.quiet);

    tokio::select! {
        result = pipeline.run(&ticker, &progress) => {
            let outcome = match result {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress.abandon("Analysis failed");
                    return Err(e.into());
                }
            };
            progress.finish();
            if !args.quiet {
                summary::print_summary(&outcome);
            }
            Ok(ExitCode::SUCCESS)
        }
        _ = tokio::signal::ctrl_c() => {
            progress.abandon("Interrupted");
            info!("Analysis interrupted by user");
            eprintln!("\nAnalysis interrupted");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
    }
}
