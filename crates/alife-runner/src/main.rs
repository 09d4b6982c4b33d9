//! Command line runner for a single simulated world.

mod telemetry;

use alife_core::SimulationConfig;
use alife_world::{Simulation, SimulationResult};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON configuration file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of ticks to run
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the final result as pretty JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    telemetry::init_telemetry(args.json_logs)?;

    let config = load_config(&args)?;
    info!(
        seed = config.seed,
        num_ticks = config.num_ticks,
        width = config.world.width,
        height = config.world.height,
        "Starting alife runner"
    );

    let mut simulation = Simulation::new(config).context("failed to build the world")?;
    let result = simulation.run();

    info!(
        ticks_run = result.ticks_run,
        foragers_alive = result.final_census.foragers_alive,
        colonies = result.final_census.colonies,
        total_energy = result.final_census.total_energy,
        survivors = result.survivors.len(),
        "Run finished"
    );

    if let Some(path) = &args.output {
        write_result(path, &result)?;
        info!(path = %path.display(), "Result written");
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    if let Some(ticks) = args.ticks {
        config.num_ticks = ticks;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    Ok(config)
}

fn write_result(path: &Path, result: &SimulationResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
