//! Logger and progress bar setup
//!
//! `log` output goes through `pretty_env_logger`, wrapped in `indicatif-log-bridge`
//! so log lines are suspended while the stage progress bar redraws.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::LevelFilter;

/// Initializes the global logger and returns the [`MultiProgress`] progress bars must join
///
/// Verbosity follows `RUST_LOG`, defaulting to `info`.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Already set when running under tests

    log::set_max_level(level);

    multi
}

/// Creates a bar counting completed pipeline stages
#[must_use]
pub fn stages_bar(multi: &MultiProgress, total: u64) -> ProgressBar {
    let bar = multi.add(ProgressBar::new(total));
    bar.set_style(
        ProgressStyle::with_template("{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    bar
}
