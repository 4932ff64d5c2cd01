//! Scenario set evaluation, sequential or parallel.

use std::time::Duration;

use floodgate_core::FloodgateConfig;
use tracing::info;

use crate::scenarios::AttackScenario;
use crate::simulator::{FloodSimulator, ScenarioReport};
use crate::{Result, SimulationError};

/// Evaluates an ordered scenario set against one configuration.
///
/// Each scenario run is self-contained (own controller, queue, and seeded
/// random source), so the set is embarrassingly parallel: parallel and
/// sequential evaluation produce identical reports in the same order.
#[derive(Debug)]
pub struct ScenarioRunner {
    simulator: FloodSimulator,
    scenarios: Vec<AttackScenario>,
    duration: Duration,
}

impl ScenarioRunner {
    /// Creates a runner over the given scenario set.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Config` - The configuration fails validation
    pub fn new(
        config: FloodgateConfig,
        scenarios: Vec<AttackScenario>,
        duration: Duration,
    ) -> Result<Self> {
        Ok(Self {
            simulator: FloodSimulator::new(config)?,
            scenarios,
            duration,
        })
    }

    /// Creates a runner over the standard scenario set.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Config` - The configuration fails validation
    pub fn standard(config: FloodgateConfig, duration: Duration) -> Result<Self> {
        Self::new(config, AttackScenario::standard_set(), duration)
    }

    /// The scenarios this runner will evaluate, in order.
    pub fn scenarios(&self) -> &[AttackScenario] {
        &self.scenarios
    }

    /// Evaluates every scenario sequentially.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Sampling` - A run's distribution setup failed
    pub fn run_all(&self) -> Result<Vec<ScenarioReport>> {
        self.scenarios
            .iter()
            .map(|scenario| {
                info!(scenario = %scenario.name, "simulating");
                self.simulator.run_scenario(scenario, self.duration)
            })
            .collect()
    }

    /// Evaluates every scenario on its own thread.
    ///
    /// Reports come back in scenario order, identical to [`run_all`].
    ///
    /// # Errors
    ///
    /// - `SimulationError::Sampling` - A run's distribution setup failed
    /// - `SimulationError::WorkerPanicked` - A worker thread died
    ///
    /// [`run_all`]: Self::run_all
    pub fn run_all_parallel(&self) -> Result<Vec<ScenarioReport>> {
        std::thread::scope(|scope| {
            let workers: Vec<_> = self
                .scenarios
                .iter()
                .map(|scenario| {
                    scope.spawn(move || {
                        info!(scenario = %scenario.name, "simulating");
                        self.simulator.run_scenario(scenario, self.duration)
                    })
                })
                .collect();

            workers
                .into_iter()
                .map(|worker| worker.join().unwrap_or(Err(SimulationError::WorkerPanicked)))
                .collect()
        })
    }
}
