//! Core discrete-time simulation engine.

use std::time::Duration;

use floodgate_core::{
    AdmissionController, BoundedQueue, DeterministicRng, FloodgateConfig, IdentityTier,
    Transaction,
};
use rand::distr::weighted::WeightedIndex;
use rand_distr::{Normal, Poisson};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::SimClock;
use crate::scenarios::AttackScenario;
use crate::stats::percentile;
use crate::{Result, SimulationError};

/// Default discrete time step.
pub const DEFAULT_TIME_STEP: Duration = Duration::from_millis(1);

/// Identity space for synthesized legitimate senders. Identities are drawn
/// fresh per arrival; reuse happens only by collision.
const LEGIT_IDENTITY_SPACE: u64 = 1_000_000;

/// Identity space for synthesized attacker identities.
const ATTACK_IDENTITY_SPACE: u64 = 10_000_000;

/// Aggregate result of one scenario run.
///
/// Computed once at run end from accumulated per-step statistics and
/// immutable thereafter. Consumed by external reporting; exposes structured
/// values only, no formatting beyond [`summary`](Self::summary).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// The scenario that was run
    pub scenario: AttackScenario,
    /// Simulated duration of the run
    pub duration: Duration,
    /// Seed used, echoed for reproduction
    pub seed: u64,
    /// Offered legitimate load in transactions per second
    pub legitimate_offered_tps: f64,
    /// Offered attack load in transactions per second
    pub attack_offered_tps: u64,
    /// Legitimate arrivals generated across the run
    pub legitimate_arrivals: u64,
    /// Legitimate transactions admitted and buffered
    pub legitimate_admitted: u64,
    /// Legitimate transactions dropped (admission-rejected or buffer-full)
    pub legitimate_dropped: u64,
    /// Attack arrivals generated across the run
    pub attack_arrivals: u64,
    /// Attack transactions rejected by admission control
    pub attack_filtered: u64,
    /// Attack transactions that slipped through admission
    pub attack_admitted: u64,
    /// 99th percentile latency over admitted legitimate traffic, in
    /// milliseconds (0.0 when nothing was admitted)
    pub legitimate_p99_latency_ms: f64,
}

impl ScenarioReport {
    /// Fraction of legitimate transactions dropped (0.0 when none arrived).
    pub fn drop_rate(&self) -> f64 {
        let total = self.legitimate_admitted + self.legitimate_dropped;
        if total == 0 {
            return 0.0;
        }
        self.legitimate_dropped as f64 / total as f64
    }

    /// Fraction of attack transactions filtered (0.0 when none arrived).
    pub fn filter_rate(&self) -> f64 {
        let total = self.attack_filtered + self.attack_admitted;
        if total == 0 {
            return 0.0;
        }
        self.attack_filtered as f64 / total as f64
    }

    /// Generates a human-readable summary.
    pub fn summary(&self) -> String {
        let mut summary = String::new();
        summary.push_str(&format!(
            "Scenario '{}' ({}s simulated, seed {})\n",
            self.scenario.name,
            self.duration.as_secs_f64(),
            self.seed
        ));
        summary.push_str(&format!(
            "  Legitimate: {} admitted, {} dropped ({:.1}% drop rate)\n",
            self.legitimate_admitted,
            self.legitimate_dropped,
            self.drop_rate() * 100.0
        ));
        summary.push_str(&format!(
            "  Attack: {} filtered, {} admitted ({:.1}% filtered)\n",
            self.attack_filtered,
            self.attack_admitted,
            self.filter_rate() * 100.0
        ));
        summary.push_str(&format!(
            "  Legitimate p99 latency: {:.0} ms\n",
            self.legitimate_p99_latency_ms
        ));
        summary
    }
}

/// Poisson arrival counts for one traffic class.
///
/// A non-positive offered rate degenerates to zero arrivals per step rather
/// than an error, so the baseline (no attack) scenario needs no special
/// casing in the loop.
struct ArrivalProcess(Option<Poisson<f64>>);

impl ArrivalProcess {
    fn with_rate(rate_tps: f64, step: Duration, what: &'static str) -> Result<Self> {
        let per_step_mean = rate_tps * step.as_secs_f64();
        if per_step_mean <= 0.0 {
            return Ok(Self(None));
        }
        Poisson::new(per_step_mean)
            .map(|dist| Self(Some(dist)))
            .map_err(|e| SimulationError::Sampling {
                what,
                message: e.to_string(),
            })
    }

    fn draw(&self, rng: &mut DeterministicRng) -> u64 {
        self.0
            .as_ref()
            .map_or(0, |dist| rng.sample::<f64, _>(dist) as u64)
    }
}

/// Discrete-time simulator for spam/flood attack scenarios.
///
/// Holds only the validated configuration; every [`run_scenario`] call
/// builds its own controller, queue, clock, and random source, so runs are
/// self-contained and reproducible independent of evaluation order.
///
/// [`run_scenario`]: Self::run_scenario
#[derive(Debug, Clone)]
pub struct FloodSimulator {
    config: FloodgateConfig,
}

impl FloodSimulator {
    /// Creates a simulator, failing fast on invalid configuration.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Config` - A configuration constraint is violated
    pub fn new(config: FloodgateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the validated configuration.
    pub fn config(&self) -> &FloodgateConfig {
        &self.config
    }

    /// Runs one scenario for `duration` with the default 1 ms time step.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Sampling` - A distribution rejected its
    ///   parameters at setup (never after the first step)
    pub fn run_scenario(
        &self,
        scenario: &AttackScenario,
        duration: Duration,
    ) -> Result<ScenarioReport> {
        self.run_scenario_with_step(scenario, duration, DEFAULT_TIME_STEP)
    }

    /// Runs one scenario with an explicit time step.
    ///
    /// Per-arrival draws come from a single stream in a fixed order:
    /// identity, tier, fee (consumed only when the tier draw yields tier 0),
    /// the elevated-mode throttle (only on that branch), then latency jitter
    /// (only when admitted and buffered). Attack arrivals take the identity
    /// draw and, when applicable, the throttle draw. Reordering these draws
    /// changes results for the same seed.
    ///
    /// # Errors
    ///
    /// - `SimulationError::Sampling` - A distribution rejected its
    ///   parameters at setup (never after the first step)
    pub fn run_scenario_with_step(
        &self,
        scenario: &AttackScenario,
        duration: Duration,
        step: Duration,
    ) -> Result<ScenarioReport> {
        debug!(
            scenario = %scenario.name,
            attack_tps = scenario.attack_tps,
            ?duration,
            "starting scenario run"
        );

        let mut rng = DeterministicRng::from_seed(self.config.seed);
        let mut clock = SimClock::new();
        let mut controller = AdmissionController::new(self.config.admission.clone());
        let mut queue = BoundedQueue::new(
            self.config.queue.capacity,
            self.config.admission.capacity_tps,
        );

        let legit_arrivals = ArrivalProcess::with_rate(
            self.config.traffic.legitimate_tps,
            step,
            "legitimate arrival",
        )?;
        let attack_arrivals =
            ArrivalProcess::with_rate(scenario.attack_tps as f64, step, "attack arrival")?;
        let tier_draw = WeightedIndex::new(self.config.traffic.tier_weights).map_err(|e| {
            SimulationError::Sampling {
                what: "identity tier",
                message: e.to_string(),
            }
        })?;
        let jitter = Normal::new(0.0, self.config.latency.jitter_std_ms).map_err(|e| {
            SimulationError::Sampling {
                what: "latency jitter",
                message: e.to_string(),
            }
        })?;

        let capacity_tps = f64::from(self.config.admission.capacity_tps);
        let step_secs = step.as_secs_f64();

        let mut stats = RunCounters::default();
        let mut latencies_ms: Vec<f64> = Vec::new();

        while clock.elapsed() < duration {
            let now = clock.secs();
            let n_legit = legit_arrivals.draw(&mut rng);
            let n_attack = attack_arrivals.draw(&mut rng);
            stats.legitimate_arrivals += n_legit;
            stats.attack_arrivals += n_attack;

            // Congestion signal seen by every arrival in this step: frozen
            // for the whole step, not updated per-arrival.
            let offered_tps = (queue.depth() as u64 + n_legit + n_attack) as f64 / step_secs;
            let load_fraction = (offered_tps / capacity_tps).min(1.0);

            for _ in 0..n_legit {
                let identity = format!("legit_{}", rng.random_range(0, LEGIT_IDENTITY_SPACE));
                let tier = IdentityTier::from_index(rng.sample(&tier_draw));
                let has_fee = tier > IdentityTier::Tier0
                    || rng.random_bool(self.config.traffic.voluntary_fee_rate);
                let tx = Transaction {
                    identity,
                    tier,
                    has_fee,
                    arrival_time: now,
                };

                let decision = controller.decide(&tx, load_fraction, &mut rng);
                if decision.is_admitted() && queue.try_enqueue() {
                    stats.legitimate_admitted += 1;

                    // Queueing delay behind the current backlog, plus jitter.
                    let queue_delay_ms = (queue.depth() as f64 / capacity_tps) * 1000.0;
                    let latency_ms = self.config.latency.base_latency_ms
                        + queue_delay_ms
                        + rng.sample::<f64, _>(&jitter);
                    latencies_ms.push(latency_ms.max(self.config.latency.floor_ms));
                } else {
                    // Admitted-but-buffer-full counts as dropped, exactly
                    // like an admission rejection.
                    stats.legitimate_dropped += 1;
                }
            }

            for _ in 0..n_attack {
                // Attackers present fresh fake identities: tier 0, no fee.
                let tx = Transaction {
                    identity: format!("attack_{}", rng.random_range(0, ATTACK_IDENTITY_SPACE)),
                    tier: IdentityTier::Tier0,
                    has_fee: false,
                    arrival_time: now,
                };

                let decision = controller.decide(&tx, load_fraction, &mut rng);
                if decision.is_admitted() {
                    stats.attack_admitted += 1;
                    queue.force_enqueue();
                } else {
                    stats.attack_filtered += 1;
                }
            }

            queue.drain(step);
            clock.advance(step);
        }

        let report = ScenarioReport {
            scenario: scenario.clone(),
            duration,
            seed: rng.seed(),
            legitimate_offered_tps: self.config.traffic.legitimate_tps,
            attack_offered_tps: scenario.attack_tps,
            legitimate_arrivals: stats.legitimate_arrivals,
            legitimate_admitted: stats.legitimate_admitted,
            legitimate_dropped: stats.legitimate_dropped,
            attack_arrivals: stats.attack_arrivals,
            attack_filtered: stats.attack_filtered,
            attack_admitted: stats.attack_admitted,
            legitimate_p99_latency_ms: percentile(&latencies_ms, 99.0),
        };

        info!(
            scenario = %scenario.name,
            admitted = report.legitimate_admitted,
            dropped = report.legitimate_dropped,
            filtered = report.attack_filtered,
            tracked_identities = controller.tracked_identities(),
            p99_ms = report.legitimate_p99_latency_ms,
            "scenario run complete"
        );

        Ok(report)
    }
}

/// Per-run aggregate counters.
#[derive(Debug, Default)]
struct RunCounters {
    legitimate_arrivals: u64,
    legitimate_admitted: u64,
    legitimate_dropped: u64,
    attack_arrivals: u64,
    attack_filtered: u64,
    attack_admitted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_run(attack_tps: u64, secs: u64) -> ScenarioReport {
        let simulator = FloodSimulator::new(FloodgateConfig::default()).unwrap();
        simulator
            .run_scenario(
                &AttackScenario::custom(attack_tps),
                Duration::from_secs(secs),
            )
            .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = FloodgateConfig::default();
        config.admission.capacity_tps = 0;
        assert!(FloodSimulator::new(config).is_err());
    }

    #[test]
    fn test_no_attack_run_filters_nothing() {
        let report = short_run(0, 10);

        assert_eq!(report.attack_arrivals, 0);
        assert_eq!(report.attack_filtered, 0);
        assert_eq!(report.attack_admitted, 0);
        assert!(report.legitimate_arrivals > 0);
    }

    #[test]
    fn test_latency_samples_respect_floor() {
        let mut config = FloodgateConfig::default();
        // Base below the floor so only the floor can explain the minimum.
        config.latency.base_latency_ms = 10.0;
        config.latency.jitter_std_ms = 200.0;
        let simulator = FloodSimulator::new(config).unwrap();

        let report = simulator
            .run_scenario(&AttackScenario::custom(0), Duration::from_secs(20))
            .unwrap();
        assert!(report.legitimate_p99_latency_ms >= 100.0);
    }

    #[test]
    fn test_zero_duration_yields_empty_report() {
        let report = short_run(500_000, 0);

        assert_eq!(report.legitimate_arrivals, 0);
        assert_eq!(report.legitimate_admitted + report.legitimate_dropped, 0);
        // Degenerate statistics default to zero, never an error.
        assert_eq!(report.legitimate_p99_latency_ms, 0.0);
        assert_eq!(report.drop_rate(), 0.0);
        assert_eq!(report.filter_rate(), 0.0);
    }

    #[test]
    fn test_low_rate_attack_is_admitted_under_normal_mode() {
        // Offered load stays below the elevated threshold, so attack traffic
        // faces only the rate limiter and mostly slips through.
        let report = short_run(1_000, 5);

        assert!(report.attack_arrivals > 0);
        assert!(report.attack_admitted > 0);
        assert!(report.filter_rate() < 0.5);
    }

    #[test]
    fn test_report_serializes() {
        let report = short_run(0, 1);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"legitimate_admitted\""));
    }
}
