//! Floodgate Core - Admission control and congestion-response primitives
//!
//! This crate provides the building blocks for evaluating spam/flood
//! resilience of a transaction-processing pipeline: centralized
//! configuration, the identity-based admission controller, the bounded
//! processing queue, and the reproducible random source that everything
//! stochastic flows through.

pub mod admission;
pub mod config;
pub mod queue;
pub mod random;

// Re-export main types for convenient access
pub use admission::{
    AdmissionController, AdmissionDecision, CongestionMode, IdentityTier, RejectReason,
    Transaction,
};
pub use config::{
    AdmissionConfig, FloodgateConfig, LatencyModelConfig, QueueConfig, TrafficConfig,
};
pub use queue::BoundedQueue;
pub use random::DeterministicRng;

/// Configuration constraint violations, surfaced at construction.
///
/// These are the only failures in the system; once a configuration
/// validates, every downstream operation is a total function.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A capacity or rate field that must be positive is zero
    #[error("{field} must be positive")]
    NonPositive {
        /// Offending configuration field
        field: &'static str,
    },

    /// Congestion thresholds must be strictly increasing, each in (0, 1]
    #[error(
        "congestion thresholds must be strictly increasing in (0, 1]: \
         elevated={elevated}, high={high}, critical={critical}"
    )]
    InvalidThresholds {
        /// Configured elevated threshold
        elevated: f64,
        /// Configured high threshold
        high: f64,
        /// Configured critical threshold
        critical: f64,
    },

    /// A rate or duration field is negative, non-finite, or out of range
    #[error("{field} is out of range: {value}")]
    NegativeRate {
        /// Offending configuration field
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Tier weights must be non-negative with a positive sum
    #[error("tier weights must be non-negative with a positive sum: {weights:?}")]
    InvalidTierWeights {
        /// Rejected weight vector
        weights: [f64; 4],
    },
}

/// Convenience result alias for configuration-time operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
