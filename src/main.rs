//! mdsandbox - A deterministic 2D block sandbox simulation
//!
//! Headless executable: loads the sandbox config, runs the simulation for a fixed
//! number of ticks and writes event logs and saves.

mod config;
mod headless;
mod input_script;

use anyhow::Result;
use clap::Parser;
use config::{SandboxConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the mdsandbox simulation headless", long_about = None)]
struct Args {
    /// Sandbox config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// World seed (overrides the config)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate (overrides the config)
    #[arg(long)]
    ticks: Option<u64>,
    /// Milliseconds per tick (overrides the config)
    #[arg(long)]
    dt_ms: Option<f32>,
    /// JSON input script with tick-indexed player actions
    #[arg(long)]
    script: Option<PathBuf>,
    /// Write tick events here as JSONL
    #[arg(long)]
    events: Option<PathBuf>,
    /// Write the final game state here
    #[arg(long)]
    save: Option<PathBuf>,
    /// Start from this save instead of a fresh world
    #[arg(long)]
    load: Option<PathBuf>,
    /// Write run metrics here as JSON
    #[arg(long)]
    metrics: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting mdsandbox v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let sandbox = SandboxConfig::load_from_path(&args.config);
    let mut game = sandbox.game_config();
    if let Some(seed) = args.seed {
        game.seed = seed;
    }

    let summary = headless::run(HeadlessConfig {
        game,
        ticks: args.ticks.unwrap_or(sandbox.simulation.ticks),
        dt_ms: args.dt_ms.unwrap_or(sandbox.simulation.dt_ms),
        script: args.script,
        events: args.events,
        save: args.save,
        load: args.load,
        metrics: args.metrics,
    })?;

    println!(
        "Simulated {} ticks: {} events, {} blocks broken, {} kills, health {:.1}, time {}",
        summary.ticks,
        summary.events,
        summary.blocks_broken,
        summary.kills,
        summary.player_health,
        summary.time_string
    );
    Ok(())
}
