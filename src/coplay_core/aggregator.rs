//! Global coplay totals across all servers

use super::session::PlayerPairKey;
use std::collections::{HashMap, HashSet};

/// Run-wide mapping from player pair to total coplay seconds.
///
/// Created once per run and mutated additively by every server's filtered
/// contribution; the only state whose lifetime spans the whole job. Each
/// server must be merged exactly once. A duplicate merge is a programming
/// defect, not a recoverable condition, and panics.
#[derive(Debug, Default)]
pub struct GlobalCoplayTotals {
    totals: HashMap<PlayerPairKey, i64>,
    merged_servers: HashSet<i64>,
}

impl GlobalCoplayTotals {
    pub fn new() -> Self {
        Self {
            totals: HashMap::new(),
            merged_servers: HashSet::new(),
        }
    }

    /// Merge one server's filtered contribution.
    pub fn merge(&mut self, server_id: i64, contribution: Vec<(PlayerPairKey, i64)>) {
        assert!(
            self.merged_servers.insert(server_id),
            "server {} merged twice into global totals",
            server_id
        );
        for (key, duration) in contribution {
            *self.totals.entry(key).or_insert(0) += duration;
        }
    }

    pub fn get(&self, key: &PlayerPairKey) -> Option<i64> {
        self.totals.get(key).copied()
    }

    pub fn pair_count(&self) -> usize {
        self.totals.len()
    }

    pub fn merged_server_count(&self) -> usize {
        self.merged_servers.len()
    }

    /// Finalize: hand the totals to the reporter.
    pub fn into_totals(self) -> HashMap<PlayerPairKey, i64> {
        self.totals
    }
}
