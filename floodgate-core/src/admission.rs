//! Identity-based admission policy under congestion.
//!
//! The controller decides admit/reject per transaction from the current
//! congestion mode, the sender's tier and fee, and the identity's recent
//! access history. Exactly one congestion-mode rule applies per call; the
//! rate limit applies after the mode gate to every surviving transaction.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AdmissionConfig;
use crate::random::DeterministicRng;

/// Probability that a tier-0 no-fee transaction is throttled in elevated mode.
const TIER0_THROTTLE_PROBABILITY: f64 = 0.5;

/// Identity verification tier of a sender, weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IdentityTier {
    Tier0,
    Tier1,
    Tier2,
    Tier3,
}

impl IdentityTier {
    /// Maps a categorical draw index (0..4) to a tier.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Tier0,
            1 => Self::Tier1,
            2 => Self::Tier2,
            _ => Self::Tier3,
        }
    }
}

/// Congestion mode derived from instantaneous offered load.
///
/// A pure function of the load fraction and the configured thresholds,
/// not of history. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CongestionMode {
    Normal,
    Elevated,
    High,
    Critical,
}

impl CongestionMode {
    /// Derives the mode for a load fraction in [0, 1].
    pub fn from_load(load_fraction: f64, config: &AdmissionConfig) -> Self {
        if load_fraction < config.elevated_threshold {
            Self::Normal
        } else if load_fraction < config.high_threshold {
            Self::Elevated
        } else if load_fraction < config.critical_threshold {
            Self::High
        } else {
            Self::Critical
        }
    }
}

impl fmt::Display for CongestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{name}")
    }
}

/// One transaction arrival, as seen by the admission controller.
///
/// Ephemeral: created per arrival inside a time step and discarded after
/// the decision (and, if admitted, the latency estimate).
#[derive(Debug, Clone)]
pub struct Transaction {
    /// Sender identity key
    pub identity: String,
    /// Sender verification tier
    pub tier: IdentityTier,
    /// Whether a priority fee is attached
    pub has_fee: bool,
    /// Arrival time in seconds since run start
    pub arrival_time: f64,
}

/// Why a transaction was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// Critical mode admits only tier >= 2 with a fee
    CriticalModeRejection,
    /// High mode suspends tier 0 entirely
    Tier0Suspended,
    /// High mode requires a fee from tier >= 1
    FeeRequired,
    /// Elevated mode randomly throttles tier-0 no-fee traffic
    Tier0Throttled,
    /// Identity exceeded its per-second admission rate
    RateLimited,
}

impl RejectReason {
    /// Stable machine-readable form of the reason.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CriticalModeRejection => "critical_mode_rejection",
            Self::Tier0Suspended => "tier0_suspended",
            Self::FeeRequired => "fee_required",
            Self::Tier0Throttled => "tier0_throttled",
            Self::RateLimited => "rate_limited",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one admission decision.
///
/// Every input combination has a defined outcome; deciding cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    Admitted,
    Rejected(RejectReason),
}

impl AdmissionDecision {
    /// Whether the transaction was admitted.
    pub fn is_admitted(self) -> bool {
        matches!(self, Self::Admitted)
    }

    /// Stable machine-readable form of the outcome.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Rejected(reason) => reason.as_str(),
        }
    }
}

/// Stateful admission policy engine.
///
/// Owns the per-identity last-access table. The table grows with each new
/// admitted identity over a run and is never evicted; only the most recent
/// access time per identity is ever read.
#[derive(Debug)]
pub struct AdmissionController {
    config: AdmissionConfig,
    /// Minimum spacing between admissions for one identity, in seconds
    min_spacing_secs: f64,
    last_access: HashMap<String, f64>,
}

impl AdmissionController {
    /// Creates a controller with empty identity state.
    ///
    /// The configuration is assumed validated; `rate_limit_per_sec` must be
    /// positive for the spacing to be finite.
    pub fn new(config: AdmissionConfig) -> Self {
        let min_spacing_secs = 1.0 / f64::from(config.rate_limit_per_sec.max(1));
        Self {
            config,
            min_spacing_secs,
            last_access: HashMap::new(),
        }
    }

    /// Decides admit/reject for one transaction.
    ///
    /// Rules are evaluated in fixed order: congestion-mode gate first (one
    /// rule per call), then the per-identity rate limit. The elevated-mode
    /// throttle is the only probabilistic branch and consumes exactly one
    /// draw from `rng` when it applies. Identity state is written only on
    /// admission; every rejection leaves it untouched.
    ///
    /// `load_fraction` is the caller-computed offered-load fraction in
    /// [0, 1], frozen for all arrivals of the current time step.
    pub fn decide(
        &mut self,
        tx: &Transaction,
        load_fraction: f64,
        rng: &mut DeterministicRng,
    ) -> AdmissionDecision {
        match CongestionMode::from_load(load_fraction, &self.config) {
            CongestionMode::Critical => {
                if tx.tier < IdentityTier::Tier2 || !tx.has_fee {
                    return AdmissionDecision::Rejected(RejectReason::CriticalModeRejection);
                }
            }
            CongestionMode::High => {
                if tx.tier == IdentityTier::Tier0 {
                    return AdmissionDecision::Rejected(RejectReason::Tier0Suspended);
                }
                if !tx.has_fee {
                    return AdmissionDecision::Rejected(RejectReason::FeeRequired);
                }
            }
            CongestionMode::Elevated => {
                if tx.tier == IdentityTier::Tier0
                    && !tx.has_fee
                    && rng.random_bool(TIER0_THROTTLE_PROBABILITY)
                {
                    return AdmissionDecision::Rejected(RejectReason::Tier0Throttled);
                }
            }
            CongestionMode::Normal => {}
        }

        if let Some(last) = self.last_access.get(&tx.identity) {
            if tx.arrival_time - last < self.min_spacing_secs {
                return AdmissionDecision::Rejected(RejectReason::RateLimited);
            }
        }

        self.last_access
            .insert(tx.identity.clone(), tx.arrival_time);
        AdmissionDecision::Admitted
    }

    /// Number of identities with recorded access history.
    pub fn tracked_identities(&self) -> usize {
        self.last_access.len()
    }
}
