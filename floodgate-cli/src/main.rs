//! Floodgate CLI - Command-line interface
//!
//! Runs the spam/flood resilience scenario set and renders per-scenario
//! reports as a text table or JSON.

mod report;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use floodgate_core::FloodgateConfig;
use floodgate_sim::{AttackScenario, ScenarioRunner};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "floodgate")]
#[command(about = "Spam/flood resilience simulator for transaction admission control")]
struct Cli {
    /// Simulation duration in seconds
    #[arg(short, long, default_value_t = 1000.0)]
    duration: f64,

    /// Random seed for reproducibility (defaults to the configured seed)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Comma-separated attack rates replacing the standard scenario set
    /// (e.g. '0,50000,200000,500000')
    #[arg(long, value_delimiter = ',')]
    attack_rates: Option<Vec<u64>>,

    /// Evaluate scenarios on parallel worker threads
    #[arg(long)]
    parallel: bool,

    /// Emit reports as a JSON array instead of a table
    #[arg(long)]
    json: bool,

    /// Console log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .init();

    let duration = Duration::try_from_secs_f64(cli.duration)
        .context("duration must be a non-negative number of seconds")?;

    let mut config = FloodgateConfig::from_env();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    let scenarios = match &cli.attack_rates {
        Some(rates) => rates.iter().copied().map(AttackScenario::custom).collect(),
        None => AttackScenario::standard_set(),
    };

    let runner = ScenarioRunner::new(config.clone(), scenarios, duration)
        .context("invalid configuration")?;

    if !cli.json {
        println!("Floodgate DoS resilience simulation");
        println!("===================================");
        println!("Duration: {:.0}s", cli.duration);
        println!("Seed: {}", config.seed);
        println!("System capacity: {} TPS", config.admission.capacity_tps);
        println!(
            "Legitimate baseline: {:.0} TPS",
            config.traffic.legitimate_tps
        );
        println!();
    }

    let reports = if cli.parallel {
        runner.run_all_parallel()
    } else {
        runner.run_all()
    }
    .context("simulation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!();
        println!("DoS mitigation under simulated attack");
        println!("=====================================");
        println!("{}", report::render_table(&reports));
        println!();
        print!("{}", report::render_filtering_efficiency(&reports));
    }

    Ok(())
}
