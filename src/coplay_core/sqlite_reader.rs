//! SQLite-based session reader with incremental cursor
//!
//! Reads crawled sessions from the `sessions` table in id-ordered batches.
//! The exclusion rules (open sessions, non-positive ids, anomalously long
//! durations) are applied in SQL so excluded rows never cross into Rust.

use super::session::Session;
use super::store::SessionStore;
use crate::sqlite_pragma::apply_optimized_pragmas;
use rusqlite::Connection;
use std::path::Path;

const BATCH_SIZE: usize = 1000;

#[derive(Debug)]
pub enum SqliteReaderError {
    Database(rusqlite::Error),
}

impl From<rusqlite::Error> for SqliteReaderError {
    fn from(err: rusqlite::Error) -> Self {
        SqliteReaderError::Database(err)
    }
}

impl std::fmt::Display for SqliteReaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SqliteReaderError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for SqliteReaderError {}

/// SQLite session reader with incremental cursor
pub struct SqliteSessionReader {
    conn: Connection,
    last_read_id: i64,
    max_session_duration_secs: i64,
}

impl SqliteSessionReader {
    /// Open the session database read-only, cursor at the beginning.
    pub fn new(
        db_path: impl AsRef<Path>,
        max_session_duration_secs: i64,
    ) -> Result<Self, SqliteReaderError> {
        let conn = Connection::open(db_path)?;

        apply_optimized_pragmas(&conn).map_err(SqliteReaderError::Database)?;

        // Read-only mode prevents the batch job taking write locks.
        conn.execute("PRAGMA query_only = ON", [])?;

        Ok(Self {
            conn,
            last_read_id: 0,
            max_session_duration_secs,
        })
    }

    /// Read the next batch of valid sessions after the cursor.
    ///
    /// Returns up to 1000 sessions per call, ordered by id ASC. Open
    /// sessions, inverted intervals, non-positive ids, and sessions over
    /// the duration cap are filtered out in the query itself.
    pub fn read_batch(&mut self) -> Result<Vec<Session>, SqliteReaderError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, server_id, player_id, start_time, stop_time
             FROM sessions
             WHERE id > ?1
               AND server_id > 0
               AND player_id > 0
               AND start_time > 0
               AND stop_time IS NOT NULL
               AND stop_time > start_time
               AND stop_time - start_time <= ?2
             ORDER BY id ASC
             LIMIT ?3",
        )?;

        let rows = stmt.query_map(
            rusqlite::params![self.last_read_id, self.max_session_duration_secs, BATCH_SIZE as i64],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    Session::new(row.get(3)?, row.get(4)?, row.get(2)?, row.get(1)?),
                ))
            },
        )?;

        let mut sessions = Vec::new();
        let mut max_id = self.last_read_id;

        for result in rows {
            let (id, session) = result?;
            sessions.push(session);
            max_id = max_id.max(id);
        }

        if max_id > self.last_read_id {
            self.last_read_id = max_id;
            log::debug!(
                "📥 Read {} sessions, cursor updated to id={}",
                sessions.len(),
                max_id
            );
        }

        Ok(sessions)
    }

    /// Drain the whole table into a store; returns the number of sessions read.
    pub fn read_all(&mut self, store: &mut SessionStore) -> Result<usize, SqliteReaderError> {
        let mut total = 0;
        loop {
            let batch = self.read_batch()?;
            if batch.is_empty() {
                return Ok(total);
            }
            total += batch.len();
            for session in batch {
                store.insert(session);
            }
        }
    }

    /// Get current cursor position
    pub fn cursor_position(&self) -> i64 {
        self.last_read_id
    }
}
