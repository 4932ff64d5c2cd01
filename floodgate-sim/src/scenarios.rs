//! Attack scenario definitions.

use serde::{Deserialize, Serialize};

/// Immutable description of one attack configuration.
///
/// Created once at configuration time and consumed read-only by the
/// simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackScenario {
    /// Human-readable scenario name
    pub name: String,
    /// Offered attack load in transactions per second
    pub attack_tps: u64,
    /// What kind of adversary this models
    pub description: String,
}

impl AttackScenario {
    /// Creates a scenario.
    pub fn new(name: impl Into<String>, attack_tps: u64, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attack_tps,
            description: description.into(),
        }
    }

    /// Creates an ad-hoc scenario for a single attack rate.
    pub fn custom(attack_tps: u64) -> Self {
        Self::new(format!("Attack @ {attack_tps}/s"), attack_tps, "Custom")
    }

    /// The standard evaluation set, from no attack up to a sustained flood.
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self::new("Baseline (no attack)", 0, "Normal operation"),
            Self::new("Moderate spam (50k/s)", 50_000, "Distributed spam attack"),
            Self::new("Heavy spam (200k/s)", 200_000, "Coordinated attack"),
            Self::new("Sustained flood (500k/s)", 500_000, "State-level adversary"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_rates_ascend() {
        let scenarios = AttackScenario::standard_set();

        assert_eq!(scenarios.len(), 4);
        assert_eq!(scenarios[0].attack_tps, 0);
        assert!(
            scenarios
                .windows(2)
                .all(|pair| pair[0].attack_tps < pair[1].attack_tps)
        );
    }

    #[test]
    fn test_custom_scenario_naming() {
        let scenario = AttackScenario::custom(75_000);
        assert_eq!(scenario.name, "Attack @ 75000/s");
        assert_eq!(scenario.attack_tps, 75_000);
    }
}
