//! Per-server significance filtering of pair sums

use super::session::{CoplayAccumulator, PlayerPairKey};

/// Default minimum per-server coplay duration worth reporting upward: 3 hours.
pub const DEFAULT_SIGNIFICANCE_THRESHOLD_SECS: i64 = 10800;

/// Drops pair sums at or below a threshold before they leave per-server scope.
///
/// Most pairs accumulate only incidental overlap; discarding them here keeps
/// the global accumulator proportional to meaningful relationships instead of
/// the full combinatorial space. The filtering is lossy across servers: a pair
/// below threshold on every individual server never reaches the global total,
/// however large their combined time is. Disable the filter for
/// high-fidelity runs that can afford the memory.
#[derive(Clone)]
pub struct SignificanceFilter {
    threshold_secs: i64,
    enabled: bool,
}

impl SignificanceFilter {
    pub fn new(threshold_secs: i64) -> Self {
        Self {
            threshold_secs,
            enabled: true,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_SIGNIFICANCE_THRESHOLD_SECS)
    }

    /// A disabled filter passes every pair through to the global merge.
    pub fn disabled() -> Self {
        Self {
            threshold_secs: 0,
            enabled: false,
        }
    }

    /// Consume a server's accumulator, keeping entries strictly above the
    /// threshold. Equality is excluded: a pair at exactly the threshold is
    /// dropped, one second above is retained.
    pub fn apply(&self, acc: CoplayAccumulator) -> Vec<(PlayerPairKey, i64)> {
        acc.into_inner()
            .into_iter()
            .filter(|&(_, duration)| !self.enabled || duration > self.threshold_secs)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator_with(entries: &[(i64, i64, i64)]) -> CoplayAccumulator {
        let mut acc = CoplayAccumulator::new();
        for &(a, b, duration) in entries {
            acc.add(PlayerPairKey::new(a, b), duration);
        }
        acc
    }

    #[test]
    fn test_threshold_is_strict() {
        let filter = SignificanceFilter::with_defaults();
        let acc = accumulator_with(&[(1, 2, 10800), (3, 4, 10801)]);

        let kept = filter.apply(acc);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0], (PlayerPairKey::new(3, 4), 10801));
    }

    #[test]
    fn test_below_threshold_dropped() {
        let filter = SignificanceFilter::with_defaults();
        let acc = accumulator_with(&[(1, 2, 3600), (2, 3, 1000)]);

        assert!(filter.apply(acc).is_empty());
    }

    #[test]
    fn test_disabled_filter_keeps_everything() {
        let filter = SignificanceFilter::disabled();
        let acc = accumulator_with(&[(1, 2, 1), (3, 4, 10801)]);

        assert_eq!(filter.apply(acc).len(), 2);
    }

    #[test]
    fn test_custom_threshold() {
        let filter = SignificanceFilter::new(500);
        let acc = accumulator_with(&[(1, 2, 500), (3, 4, 501)]);

        let kept = filter.apply(acc);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0, PlayerPairKey::new(3, 4));
    }
}
