//! In-memory session store: per-server grouping, viability filtering,
//! and ascending-activity scheduling.

use super::session::Session;
use std::collections::HashMap;

/// Groups validated sessions by server id and decides processing order.
///
/// Servers that cannot produce any overlap (fewer than the viability
/// minimum) are dropped up front so they never occupy memory during the
/// sweep. The remaining servers are processed in ascending session-count
/// order: small servers release their memory quickly, so the largest
/// accumulators exist for the shortest possible time.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Vec<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    pub fn insert(&mut self, session: Session) {
        self.sessions
            .entry(session.server_id)
            .or_default()
            .push(session);
    }

    pub fn server_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.values().map(|v| v.len()).sum()
    }

    /// Drop servers whose session count is below `min_sessions`.
    ///
    /// Returns the number of servers removed. A single session cannot
    /// overlap with anything, so retaining it only consumes memory.
    pub fn retain_viable(&mut self, min_sessions: usize) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, v| v.len() >= min_sessions);
        before - self.sessions.len()
    }

    /// Processing order: ascending session count, ties by server id.
    ///
    /// The ordering affects only peak memory, never correctness, so the
    /// tie-break just needs to be deterministic for reproducible runs.
    pub fn schedule(&self) -> Vec<i64> {
        let mut order: Vec<(usize, i64)> = self
            .sessions
            .iter()
            .map(|(&server_id, v)| (v.len(), server_id))
            .collect();
        order.sort_unstable();
        order.into_iter().map(|(_, server_id)| server_id).collect()
    }

    /// Remove and return one server's sessions so the list can be dropped
    /// as soon as its contribution has been merged.
    pub fn take_server(&mut self, server_id: i64) -> Option<Vec<Session>> {
        self.sessions.remove(&server_id)
    }
}
