//! Tick Features - headless scenario runner
//!
//! Builds the config tree, registers the teleport aura and SafeWalk, drives
//! a scenario with simulated time and prints a report.

use std::path::PathBuf;

use clap::Parser;
use tick_features::core::config::set_timing;
use tick_features::core::error::Result;
use tick_features::simulation::{RunReport, Scenario, Simulation};

/// Run a feature scenario without a host client
#[derive(Parser, Debug)]
#[command(name = "tick-features")]
#[command(about = "Drive the aura and SafeWalk features through a simulated scenario")]
struct Args {
    /// Scenario file (TOML); built-in defaults when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Override the number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Also print the config tree after the run
    #[arg(long)]
    tree: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tick_features=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        scenario.seed = seed;
    }

    if let Some(timing) = scenario.timing.clone() {
        if set_timing(timing).is_err() {
            tracing::warn!("timing config already initialized, keeping defaults");
        }
    }

    tracing::info!(scenario = %scenario.name, ticks = scenario.ticks, seed = scenario.seed, "Tick Features starting...");

    let mut simulation = Simulation::new(&scenario)?;
    for _ in 0..scenario.ticks {
        simulation.step();
    }
    let report = simulation.report();

    match args.format.as_str() {
        "text" => print_text(&report),
        _ => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if args.tree {
        println!("{}", serde_json::to_string_pretty(&simulation.snapshot())?);
    }

    Ok(())
}

fn print_text(report: &RunReport) {
    println!("=== {} ===", report.scenario);
    println!("Ticks:            {} ({} ms)", report.ticks, report.simulated_ms);
    println!("Attacks:          {} ({:.2}/s)", report.attacks, report.attack_rate);
    println!("Teleport runs:    {}", report.runs);
    println!("Packets:          {}", report.packets);
    println!("Kills:            {}", report.kills);
    println!("Final stamina:    {}", report.final_stamina);
    println!("SafeWalk ticks:   {}", report.safe_walk_ticks);
    println!("Cancelled moves:  {}", report.cancelled_movement_ticks);
    println!("Weapon slot held: {} ticks", report.weapon_slot_ticks);
}
