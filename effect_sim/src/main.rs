//! effect_sim - Headless scenario runner for effect_core
//!
//! Loads a TOML scenario plus optional JSON content and engine constants,
//! runs the battlefield tick loop and prints a combat log.

mod scenario;
mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use effect_core::battlefield::{ImpactOutcome, TickReport};
use effect_core::config::{ContentLibrary, EngineConfig};
use scenario::Scenario;
use simulation::Simulation;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "effect_sim")]
#[command(about = "Run a scripted effect/status scenario", long_about = None)]
struct Cli {
    /// Scenario TOML file
    #[arg(long)]
    scenario: PathBuf,

    /// Content JSON file (spells, units, towers, traps, heroes)
    #[arg(long)]
    content: Option<PathBuf>,

    /// Engine constants TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed for status chance rolls; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Print every non-empty tick report as a JSON line
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let content = match &cli.content {
        Some(path) => ContentLibrary::load(path)
            .with_context(|| format!("loading content {}", path.display()))?,
        None => ContentLibrary::new(),
    };
    let scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("loading scenario {}", cli.scenario.display()))?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("effect_sim v{} (seed {})", env!("CARGO_PKG_VERSION"), seed);

    let mut sim = Simulation::new(scenario, content, config, seed)?;
    let json = cli.json;
    let mut write_error = None;
    sim.run(|report| {
        if report.is_quiet() {
            return;
        }
        if json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{}", line),
                Err(e) => write_error = Some(e),
            }
        } else {
            print_tick(report);
        }
    });
    if let Some(e) = write_error {
        return Err(e).context("serializing tick report");
    }

    println!("\n{}", sim.summary());
    Ok(())
}

fn print_tick(report: &TickReport) {
    for (id, result) in &report.statuses {
        if result.burn_ticks > 0 {
            println!(
                "[{:>6.2}] {} burned for {:.1} ({} ticks)",
                report.time, id, result.burn_damage, result.burn_ticks
            );
        }
        for kind in &result.expired {
            println!("[{:>6.2}] {} {} expired", report.time, id, kind);
        }
    }
    for impact in &report.impacts {
        match &impact.outcome {
            ImpactOutcome::Fizzled { target } => {
                println!("[{:>6.2}] {} fizzled ({} gone)", report.time, impact.projectile, target)
            }
            _ => println!(
                "[{:>6.2}] {} hit {:?} for {:.1}",
                report.time,
                impact.projectile,
                impact.targets(),
                impact.total_damage()
            ),
        }
    }
    for id in &report.deaths {
        println!("[{:>6.2}] {} died", report.time, id);
    }
}
