// SPDX-License-Identifier: MIT OR Apache-2.0
//! cuetrack preview - headless action previewer
//!
//! Loads an action and a script of transport commands from a RON scenario,
//! runs them through a timeline instance and prints every cue event with the
//! frame it fired on.
//!
//! ## Usage
//!
//! ```text
//! cuetrack_preview demos/jab.ron
//! cuetrack_preview demos/jab.ron --config preview.ron --json
//! ```

mod config;
mod runner;
mod scenario;

use clap::Parser;
use config::{ConfigError, PreviewConfig};
use scenario::{Scenario, ScenarioError};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "cuetrack_preview", version, about = "Run a cue scenario headlessly")]
struct Args {
    /// Scenario file (RON)
    scenario: PathBuf,

    /// Preview config file (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
enum PreviewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),

    #[error("Failed to encode event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

fn main() {
    let args = Args::parse();

    // Config errors are reported once logging is up
    let config = args.config.as_deref().map(PreviewConfig::load).transpose();
    let log_filter = match &config {
        Ok(Some(config)) => config.log_filter.as_str(),
        _ => config::DEFAULT_LOG_FILTER,
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting cuetrack preview v{}", env!("CARGO_PKG_VERSION"));

    let result = config
        .map_err(PreviewError::from)
        .and_then(|config| run(&args, config.unwrap_or_default()));
    if let Err(e) = result {
        tracing::error!("Preview failed: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args, config: PreviewConfig) -> Result<(), PreviewError> {
    let scenario = Scenario::load(&args.scenario)?;
    tracing::info!(
        action = %scenario.action.name,
        cues = scenario.action.cues.len(),
        frame_rate = config.playback.frame_rate,
        "Loaded scenario"
    );

    let events = runner::run(&scenario, config.playback)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for event in &events {
        if args.json {
            serde_json::to_writer(&mut out, event)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", event.describe())?;
        }
    }
    out.flush()?;
    Ok(())
}
