//! Stage progress bar

use geyser_research::{PipelineObserver, Stage};
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {msg}";

/// Drives an indicatif bar from pipeline stage events
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    /// A hidden bar in quiet mode
    pub fn new(quiet: bool) -> Self {
        let len = Stage::ALL.len() as u64;
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(len)
        };
        let style = ProgressStyle::default_bar()
            .template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.set_message("Analysis Progress");
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Analysis complete");
    }

    pub fn abandon(&self, message: &'static str) {
        self.bar.abandon_with_message(message);
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl PipelineObserver for StageProgress {
    fn stage_started(&self, stage: Stage) {
        self.bar.set_message(stage.description());
    }

    fn stage_completed(&self, _stage: Stage) {
        self.bar.inc(1);
    }
}
