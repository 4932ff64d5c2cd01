//! Summary statistics over recorded latency samples.

/// Computes the `pct`-th percentile of `samples` with linear interpolation
/// between closest ranks.
///
/// Returns 0.0 for an empty sample set — degenerate statistics are a defined
/// default here, not an error. `pct` is clamped to [0, 100].
pub fn percentile(samples: &[f64], pct: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = pct.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    if below == above {
        sorted[below]
    } else {
        let fraction = rank - below as f64;
        sorted[below] + (sorted[above] - sorted[below]) * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_samples_default_to_zero() {
        assert_eq!(percentile(&[], 99.0), 0.0);
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(percentile(&[42.0], 0.0), 42.0);
        assert_eq!(percentile(&[42.0], 99.0), 42.0);
    }

    #[test]
    fn test_interpolates_between_ranks() {
        let samples = [10.0, 20.0, 30.0, 40.0];

        assert_eq!(percentile(&samples, 0.0), 10.0);
        assert_eq!(percentile(&samples, 50.0), 25.0);
        assert_eq!(percentile(&samples, 100.0), 40.0);
    }

    #[test]
    fn test_p99_of_hundred_samples() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        // rank 98.01 interpolates between 99.0 and 100.0
        let p99 = percentile(&samples, 99.0);
        assert!((p99 - 99.01).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input() {
        let samples = [30.0, 10.0, 40.0, 20.0];
        assert_eq!(percentile(&samples, 50.0), 25.0);
    }
}
