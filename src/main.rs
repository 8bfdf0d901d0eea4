//! Maidenhead Map
//!
//! Command-line entry point: parses arguments, loads the optional config
//! file and runs the log-to-maps pipeline.

use std::fs;
use std::io;
use std::process::ExitCode;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use maidenhead_map::application::GridMapPipeline;
use maidenhead_map::infrastructure::{ConfigRepository, MapConfig};
use maidenhead_map::presentation::{Cli, PngMapRenderer};

/// Entry point for the maidenhead-map command.
///
/// Exits with a failure status when the log is missing or has an
/// unsupported extension, or when the config file cannot be loaded.
/// Bands that fail to render are reported but do not fail the run.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match ConfigRepository::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => MapConfig::default(),
    };
    debug!(width = config.render.width, height = config.render.height, "configuration loaded");

    if let Err(err) = fs::create_dir_all(&cli.output_dir) {
        eprintln!("Error: cannot create {}: {err}", cli.output_dir.display());
        return ExitCode::FAILURE;
    }

    let renderer = PngMapRenderer::new(config.render, config.continents.clone());
    let pipeline = GridMapPipeline::from_config(&config, cli.exchange_scan(), renderer);

    match pipeline.run(&cli.request()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
