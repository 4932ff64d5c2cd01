//! Floodgate Simulation - Discrete-time spam/flood resilience evaluation.
//!
//! This crate drives the admission-control and queueing primitives from
//! `floodgate-core` through a reproducible discrete-time loop: mixed
//! legitimate and adversarial arrivals per step, one frozen congestion
//! signal per step, fixed-rate queue draining, and per-scenario tail-latency
//! and drop-rate reporting.
//!
//! # Reproducibility
//!
//! Every run owns a fresh [`DeterministicRng`](floodgate_core::DeterministicRng)
//! seeded from the configuration, so the same seed, configuration, scenario,
//! and duration always produce an identical [`ScenarioReport`] — independent
//! of which other scenarios run, or in what order. That contract is what
//! makes the parallel runner's results interchangeable with sequential ones.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use floodgate_core::FloodgateConfig;
//! use floodgate_sim::{AttackScenario, FloodSimulator};
//!
//! # fn main() -> Result<(), floodgate_sim::SimulationError> {
//! let simulator = FloodSimulator::new(FloodgateConfig::default())?;
//! let scenario = AttackScenario::new("Heavy spam (200k/s)", 200_000, "Coordinated attack");
//!
//! let report = simulator.run_scenario(&scenario, Duration::from_secs(100))?;
//! println!(
//!     "p99 {:.0}ms, drop rate {:.1}%",
//!     report.legitimate_p99_latency_ms,
//!     report.drop_rate() * 100.0
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]

pub mod clock;
pub mod runner;
pub mod scenarios;
pub mod simulator;
pub mod stats;

use floodgate_core::ConfigError;

pub use clock::SimClock;
pub use runner::ScenarioRunner;
pub use scenarios::AttackScenario;
pub use simulator::{FloodSimulator, ScenarioReport};
pub use stats::percentile;

/// Errors that can occur while setting up or dispatching simulation runs.
///
/// Nothing inside the per-step loop can fail; these all surface before the
/// first step, or from worker management in the parallel runner.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Configuration failed fail-fast validation
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A sampling distribution rejected its parameters at run setup
    #[error("{what} distribution rejected its parameters: {message}")]
    Sampling {
        /// Which distribution was being built
        what: &'static str,
        /// Underlying constructor error
        message: String,
    },

    /// A parallel scenario worker panicked
    #[error("scenario worker panicked")]
    WorkerPanicked,
}

/// Common simulation result type for convenience.
pub type Result<T> = std::result::Result<T, SimulationError>;
