//! Session records and coplay pair accumulation types

use std::collections::HashMap;

/// One player's continuous connection interval to one server.
///
/// Timestamps are Unix epoch seconds. Readers guarantee `start > 0`,
/// `stop > start`, positive ids, and that anomalously long sessions
/// (see `MAX_SESSION_DURATION_SECS`) never reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub start: i64,
    pub stop: i64,
    pub player_id: i64,
    pub server_id: i64,
}

impl Session {
    pub fn new(start: i64, stop: i64, player_id: i64, server_id: i64) -> Self {
        debug_assert!(start > 0, "session start must be positive");
        debug_assert!(stop > start, "session stop must be after start");
        debug_assert!(player_id > 0, "player_id must be positive");
        debug_assert!(server_id > 0, "server_id must be positive");
        Self {
            start,
            stop,
            player_id,
            server_id,
        }
    }

    pub fn duration_secs(&self) -> i64 {
        self.stop - self.start
    }
}

/// Canonical unordered pair of player ids.
///
/// The only constructor orders the ids, so `(a, b)` and `(b, a)` always
/// produce the same key and a non-canonical key is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerPairKey {
    pub lo: i64,
    pub hi: i64,
}

impl PlayerPairKey {
    pub fn new(a: i64, b: i64) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    pub fn is_self_pair(&self) -> bool {
        self.lo == self.hi
    }
}

/// Per-server accumulator mapping player pairs to overlap seconds.
///
/// Created empty for one server's pass, consumed once by the significance
/// filter, then dropped.
#[derive(Debug, Default)]
pub struct CoplayAccumulator {
    pairs: HashMap<PlayerPairKey, i64>,
}

impl CoplayAccumulator {
    pub fn new() -> Self {
        Self {
            pairs: HashMap::new(),
        }
    }

    /// Add overlap seconds for a pair. Zero or negative durations are a
    /// caller bug; the engine only reports strictly positive overlap.
    pub fn add(&mut self, key: PlayerPairKey, duration_secs: i64) {
        debug_assert!(duration_secs > 0, "overlap duration must be positive");
        *self.pairs.entry(key).or_insert(0) += duration_secs;
    }

    pub fn get(&self, key: &PlayerPairKey) -> Option<i64> {
        self.pairs.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerPairKey, &i64)> {
        self.pairs.iter()
    }

    pub fn into_inner(self) -> HashMap<PlayerPairKey, i64> {
        self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_canonicalization() {
        assert_eq!(PlayerPairKey::new(7, 3), PlayerPairKey::new(3, 7));
        let key = PlayerPairKey::new(9, 2);
        assert_eq!(key.lo, 2);
        assert_eq!(key.hi, 9);
    }

    #[test]
    fn test_self_pair_detection() {
        assert!(PlayerPairKey::new(5, 5).is_self_pair());
        assert!(!PlayerPairKey::new(5, 6).is_self_pair());
    }

    #[test]
    fn test_accumulator_adds_across_keys() {
        let mut acc = CoplayAccumulator::new();
        acc.add(PlayerPairKey::new(1, 2), 100);
        acc.add(PlayerPairKey::new(2, 1), 50);
        acc.add(PlayerPairKey::new(1, 3), 10);

        assert_eq!(acc.len(), 2);
        assert_eq!(acc.get(&PlayerPairKey::new(1, 2)), Some(150));
        assert_eq!(acc.get(&PlayerPairKey::new(3, 1)), Some(10));
    }

    #[test]
    fn test_session_duration() {
        let session = Session::new(1000, 4600, 1, 1);
        assert_eq!(session.duration_secs(), 3600);
    }
}
