mod analysis;
mod common;
mod config;
mod export;
mod logging;
mod parsing;
mod pipeline;
mod report;

use config::{AnalysisConfig, Args};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Cleaning error: {0}")]
    Cleaning(#[from] analysis::CleaningError),

    #[error("Plotting error: {0}")]
    Plot(#[from] common::PlotError),

    #[error("Export error: {0}")]
    Export(#[from] export::ExportError),

    #[error("Failed to write report: {0}")]
    Report(#[from] std::io::Error),

    #[error("Column '{0}' is not present in the cleaned records")]
    MissingColumn(String),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() {
    let multi = logging::init_logger();
    let config = AnalysisConfig::from(argh::from_env::<Args>());

    if let Err(error) = run(&config, &multi) {
        log::error!("{error}");
        std::process::exit(1);
    }
}

fn run(config: &AnalysisConfig, multi: &indicatif::MultiProgress) -> Result<()> {
    log::debug!("{config:?}");

    let progress = logging::stages_bar(multi, pipeline::STAGES);
    let outcome = pipeline::run(config, &progress);
    progress.finish_and_clear();
    let outcome = outcome?;

    report::display(&outcome);
    log::info!("Outputs saved to {}", outcome.output_dir.display());
    list_outputs(&outcome.output_dir);

    Ok(())
}

/// Log the files present in the output directory, sorted by name
fn list_outputs(output_dir: &Path) {
    let entries = match fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(error) => {
            log::warn!("Could not list {}: {error}", output_dir.display());
            return;
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    for name in names {
        log::info!("  {name}");
    }
}
