//! Centralized configuration for Floodgate.
//!
//! All tunable parameters are defined here to avoid hard-coded values
//! scattered throughout the codebase. Every section carries documented
//! defaults and is validated up front, before any simulation step runs.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Central configuration for all Floodgate components.
///
/// Groups related settings into logical sections. Supports environment
/// variable overrides for runtime customization. Immutable once handed to
/// a simulator; components receive it at construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloodgateConfig {
    pub admission: AdmissionConfig,
    pub queue: QueueConfig,
    pub traffic: TrafficConfig,
    pub latency: LatencyModelConfig,
    /// Seed for the deterministic random source. Same seed, same report.
    pub seed: u64,
}

/// Admission-control policy parameters.
///
/// Controls system capacity, the per-identity rate limit, and the load
/// thresholds at which congestion modes engage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    /// Sustained processing capacity in transactions per second
    pub capacity_tps: u32,
    /// Maximum admitted transactions per second for a single identity
    pub rate_limit_per_sec: u32,
    /// Load fraction at which elevated mode engages
    pub elevated_threshold: f64,
    /// Load fraction at which high mode engages
    pub high_threshold: f64,
    /// Load fraction at which critical mode engages
    pub critical_threshold: f64,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            capacity_tps: 15_000,
            rate_limit_per_sec: 5,
            elevated_threshold: 0.60,
            high_threshold: 0.80,
            critical_threshold: 0.95,
        }
    }
}

/// Processing-buffer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum buffered transactions before arrivals overflow
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self { capacity: 100_000 }
    }
}

/// Legitimate-traffic generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Offered legitimate load in transactions per second.
    ///
    /// The default is the implied average of roughly 9.1 billion
    /// transactions per year.
    pub legitimate_tps: f64,
    /// Relative weights of identity tiers 0 through 3 among legitimate senders
    pub tier_weights: [f64; 4],
    /// Chance that a tier-0 sender attaches a priority fee anyway
    pub voluntary_fee_rate: f64,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            legitimate_tps: 289.0,
            tier_weights: [0.4, 0.3, 0.2, 0.1],
            voluntary_fee_rate: 0.3,
        }
    }
}

/// Synthetic latency model for admitted legitimate transactions.
///
/// Latency is estimated as base + queueing delay + Gaussian jitter,
/// floored at `floor_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyModelConfig {
    /// Baseline p50 end-to-end latency in milliseconds
    pub base_latency_ms: f64,
    /// Standard deviation of the jitter term in milliseconds
    pub jitter_std_ms: f64,
    /// Lower bound on any recorded latency sample in milliseconds
    pub floor_ms: f64,
}

impl Default for LatencyModelConfig {
    fn default() -> Self {
        Self {
            base_latency_ms: 371.0,
            jitter_std_ms: 50.0,
            floor_ms: 100.0,
        }
    }
}

impl FloodgateConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(tps) = std::env::var("FLOODGATE_CAPACITY_TPS") {
            if let Ok(value) = tps.parse::<u32>() {
                config.admission.capacity_tps = value;
            }
        }

        if let Ok(seed) = std::env::var("FLOODGATE_SEED") {
            if let Ok(value) = seed.parse::<u64>() {
                config.seed = value;
            }
        }

        if let Ok(tps) = std::env::var("FLOODGATE_LEGITIMATE_TPS") {
            if let Ok(value) = tps.parse::<f64>() {
                config.traffic.legitimate_tps = value;
            }
        }

        if let Ok(capacity) = std::env::var("FLOODGATE_QUEUE_CAPACITY") {
            if let Ok(value) = capacity.parse::<usize>() {
                config.queue.capacity = value;
            }
        }

        config
    }

    /// Creates a configuration with the given seed, other fields default.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Validates every section, failing fast before any simulation runs.
    ///
    /// # Errors
    ///
    /// - `ConfigError` - First constraint violation found, see variants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admission.capacity_tps == 0 {
            return Err(ConfigError::NonPositive {
                field: "admission.capacity_tps",
            });
        }
        if self.admission.rate_limit_per_sec == 0 {
            return Err(ConfigError::NonPositive {
                field: "admission.rate_limit_per_sec",
            });
        }
        if self.queue.capacity == 0 {
            return Err(ConfigError::NonPositive {
                field: "queue.capacity",
            });
        }

        let thresholds = [
            self.admission.elevated_threshold,
            self.admission.high_threshold,
            self.admission.critical_threshold,
        ];
        let increasing = thresholds.windows(2).all(|pair| pair[0] < pair[1]);
        let in_unit_range = thresholds.iter().all(|t| *t > 0.0 && *t <= 1.0);
        if !increasing || !in_unit_range {
            return Err(ConfigError::InvalidThresholds {
                elevated: self.admission.elevated_threshold,
                high: self.admission.high_threshold,
                critical: self.admission.critical_threshold,
            });
        }

        if !self.traffic.legitimate_tps.is_finite() || self.traffic.legitimate_tps < 0.0 {
            return Err(ConfigError::NegativeRate {
                field: "traffic.legitimate_tps",
                value: self.traffic.legitimate_tps,
            });
        }
        let weight_sum: f64 = self.traffic.tier_weights.iter().sum();
        if self.traffic.tier_weights.iter().any(|w| *w < 0.0) || weight_sum <= 0.0 {
            return Err(ConfigError::InvalidTierWeights {
                weights: self.traffic.tier_weights,
            });
        }
        if !(0.0..=1.0).contains(&self.traffic.voluntary_fee_rate) {
            return Err(ConfigError::NegativeRate {
                field: "traffic.voluntary_fee_rate",
                value: self.traffic.voluntary_fee_rate,
            });
        }

        for (field, value) in [
            ("latency.base_latency_ms", self.latency.base_latency_ms),
            ("latency.jitter_std_ms", self.latency.jitter_std_ms),
            ("latency.floor_ms", self.latency.floor_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeRate { field, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = FloodgateConfig::default();

        assert_eq!(config.admission.capacity_tps, 15_000);
        assert_eq!(config.admission.rate_limit_per_sec, 5);
        assert_eq!(config.admission.elevated_threshold, 0.60);
        assert_eq!(config.admission.high_threshold, 0.80);
        assert_eq!(config.admission.critical_threshold, 0.95);
        assert_eq!(config.queue.capacity, 100_000);
        assert_eq!(config.traffic.legitimate_tps, 289.0);
        assert_eq!(config.latency.base_latency_ms, 371.0);

        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_non_positive_capacities() {
        let mut config = FloodgateConfig::default();
        config.admission.capacity_tps = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "admission.capacity_tps"
            })
        ));

        let mut config = FloodgateConfig::default();
        config.admission.rate_limit_per_sec = 0;
        assert!(config.validate().is_err());

        let mut config = FloodgateConfig::default();
        config.queue.capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let mut config = FloodgateConfig::default();
        config.admission.high_threshold = 0.5; // below elevated
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThresholds { .. })
        ));

        let mut config = FloodgateConfig::default();
        config.admission.critical_threshold = 1.5; // outside (0, 1]
        assert!(config.validate().is_err());

        let mut config = FloodgateConfig::default();
        config.admission.elevated_threshold = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_traffic_parameters() {
        let mut config = FloodgateConfig::default();
        config.traffic.legitimate_tps = -1.0;
        assert!(config.validate().is_err());

        let mut config = FloodgateConfig::default();
        config.traffic.tier_weights = [0.0, 0.0, 0.0, 0.0];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTierWeights { .. })
        ));

        let mut config = FloodgateConfig::default();
        config.traffic.voluntary_fee_rate = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("FLOODGATE_CAPACITY_TPS", "20000");
            std::env::set_var("FLOODGATE_SEED", "777");
            std::env::set_var("FLOODGATE_LEGITIMATE_TPS", "500.0");
            std::env::set_var("FLOODGATE_QUEUE_CAPACITY", "50000");
        }

        let config = FloodgateConfig::from_env();

        assert_eq!(config.admission.capacity_tps, 20_000);
        assert_eq!(config.seed, 777);
        assert_eq!(config.traffic.legitimate_tps, 500.0);
        assert_eq!(config.queue.capacity, 50_000);

        // Cleanup
        unsafe {
            std::env::remove_var("FLOODGATE_CAPACITY_TPS");
            std::env::remove_var("FLOODGATE_SEED");
            std::env::remove_var("FLOODGATE_LEGITIMATE_TPS");
            std::env::remove_var("FLOODGATE_QUEUE_CAPACITY");
        }
    }
}
