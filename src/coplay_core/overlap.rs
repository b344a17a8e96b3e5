//! Sweep-line overlap engine for one server's sessions

use super::session::{CoplayAccumulator, PlayerPairKey, Session};

/// Computes pairwise overlap durations for a single server's session list.
///
/// Sessions are sorted by start time and swept once. An active window holds
/// every previously seen session whose stop time could still overlap a
/// later-starting session; a session whose stop precedes the current start
/// can never overlap anything that starts even later, so it is pruned. The
/// work done is proportional to the overlap pairs actually examined rather
/// than the full n² session pairs.
#[derive(Clone)]
pub struct OverlapEngine {
    include_self_pairs: bool,
}

impl OverlapEngine {
    /// Self-pairs (the same player overlapping their own reconnect) carry
    /// no analytical meaning and are skipped unless explicitly requested.
    pub fn new(include_self_pairs: bool) -> Self {
        Self { include_self_pairs }
    }

    pub fn with_defaults() -> Self {
        Self::new(false)
    }

    /// Compute the coplay accumulator for one server.
    ///
    /// Pure function of the input list: ordering of the input does not
    /// affect the result. Touching intervals (`overlap_stop == overlap_start`)
    /// contribute nothing; only strictly positive overlap is counted.
    pub fn compute(&self, mut sessions: Vec<Session>) -> CoplayAccumulator {
        // Stable order for determinism: start time, then player id.
        sessions.sort_unstable_by_key(|s| (s.start, s.player_id));

        let mut acc = CoplayAccumulator::new();
        let mut active: Vec<Session> = Vec::new();

        for a in sessions {
            active.retain(|b| {
                if a.start >= b.stop {
                    // b ended before a began; every future session starts
                    // later still, so b can never overlap again.
                    return false;
                }
                if self.include_self_pairs || a.player_id != b.player_id {
                    let overlap_start = a.start.max(b.start);
                    let overlap_stop = a.stop.min(b.stop);
                    let duration = overlap_stop - overlap_start;
                    if duration > 0 {
                        acc.add(PlayerPairKey::new(a.player_id, b.player_id), duration);
                    }
                }
                true
            });
            active.push(a);
        }

        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_session(start: i64, stop: i64, player_id: i64) -> Session {
        Session::new(start, stop, player_id, 1)
    }

    #[test]
    fn test_basic_overlap() {
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(1000, 5000, 1),
            create_test_session(3000, 8000, 2),
        ]);

        assert_eq!(acc.get(&PlayerPairKey::new(1, 2)), Some(2000));
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_symmetry_order_independent() {
        let engine = OverlapEngine::with_defaults();
        let a = create_test_session(1000, 5000, 1);
        let b = create_test_session(3000, 8000, 2);

        let forward = engine.compute(vec![a, b]);
        let reverse = engine.compute(vec![b, a]);

        let key = PlayerPairKey::new(1, 2);
        assert_eq!(forward.get(&key), reverse.get(&key));
    }

    #[test]
    fn test_touching_intervals_not_counted() {
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(1000, 2000, 1),
            create_test_session(2000, 3000, 2),
        ]);

        assert!(acc.is_empty());
    }

    #[test]
    fn test_disjoint_intervals_not_counted() {
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(1000, 2000, 1),
            create_test_session(5000, 6000, 2),
        ]);

        assert!(acc.is_empty());
    }

    #[test]
    fn test_nested_session_bounded_by_inner() {
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(1000, 10000, 1),
            create_test_session(4000, 5000, 2),
        ]);

        assert_eq!(acc.get(&PlayerPairKey::new(1, 2)), Some(1000));
    }

    #[test]
    fn test_identical_sessions_full_duration() {
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(1000, 4600, 1),
            create_test_session(1000, 4600, 2),
        ]);

        assert_eq!(acc.get(&PlayerPairKey::new(1, 2)), Some(3600));
    }

    #[test]
    fn test_self_pairs_skipped_by_default() {
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(1000, 5000, 1),
            create_test_session(2000, 6000, 1),
        ]);

        assert!(acc.is_empty());
    }

    #[test]
    fn test_self_pairs_counted_when_enabled() {
        let engine = OverlapEngine::new(true);
        let acc = engine.compute(vec![
            create_test_session(1000, 5000, 1),
            create_test_session(2000, 6000, 1),
        ]);

        assert_eq!(acc.get(&PlayerPairKey::new(1, 1)), Some(3000));
    }

    #[test]
    fn test_three_session_scenario() {
        // A=(t0, t0+7200, p1), B=(t0+3600, t0+10800, p2), C=(t0+5000, t0+6000, p3)
        let t0 = 1_600_000_000;
        let engine = OverlapEngine::with_defaults();
        let acc = engine.compute(vec![
            create_test_session(t0, t0 + 7200, 1),
            create_test_session(t0 + 3600, t0 + 10800, 2),
            create_test_session(t0 + 5000, t0 + 6000, 3),
        ]);

        assert_eq!(acc.get(&PlayerPairKey::new(1, 2)), Some(3600));
        assert_eq!(acc.get(&PlayerPairKey::new(1, 3)), Some(1000));
        assert_eq!(acc.get(&PlayerPairKey::new(2, 3)), Some(1000));
        assert_eq!(acc.len(), 3);
    }

    #[test]
    fn test_expired_sessions_pruned_from_active_window() {
        // Many short disjoint sessions followed by one late session: none of
        // the expired ones may contribute, even transitively.
        let engine = OverlapEngine::with_defaults();
        let mut sessions: Vec<Session> = (0..50)
            .map(|i| create_test_session(1000 + i * 100, 1050 + i * 100, i + 1))
            .collect();
        sessions.push(create_test_session(100_000, 101_000, 99));

        let acc = engine.compute(sessions);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_conservation_bound_per_player() {
        // The sum of overlap attributed to a player never exceeds the sum
        // of that player's own session durations.
        let engine = OverlapEngine::with_defaults();
        let sessions = vec![
            create_test_session(1000, 5000, 1),
            create_test_session(1500, 4000, 2),
            create_test_session(2000, 6000, 3),
            create_test_session(4500, 9000, 2),
        ];

        let player_time: i64 = sessions
            .iter()
            .filter(|s| s.player_id == 2)
            .map(|s| s.duration_secs())
            .sum();

        let acc = engine.compute(sessions);
        let attributed: i64 = acc
            .iter()
            .filter(|(k, _)| k.lo == 2 || k.hi == 2)
            .map(|(_, &d)| d)
            .sum();

        assert!(attributed <= player_time);
    }
}
