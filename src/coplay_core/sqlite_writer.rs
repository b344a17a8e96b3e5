//! SQLite writer for coplay pair totals
//!
//! Buffers records and writes them in a single transaction on flush, so a
//! completed run lands atomically in the `coplay_totals` table.

use super::writer_backend::{PairTotalRecord, ReportWriterBackend, ReportWriterError};
use crate::sqlite_pragma::apply_optimized_pragmas;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;

pub struct SqliteReportWriter {
    conn: Connection,
    buffer: Vec<PairTotalRecord>,
}

impl SqliteReportWriter {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, ReportWriterError> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        apply_optimized_pragmas(&conn)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS coplay_totals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player_a INTEGER NOT NULL,
                player_b INTEGER NOT NULL,
                total_seconds INTEGER NOT NULL,
                computed_at INTEGER NOT NULL
            )",
            [],
        )?;

        log::info!("✅ SQLite report writer initialized");

        Ok(Self {
            conn,
            buffer: Vec::new(),
        })
    }
}

#[async_trait]
impl ReportWriterBackend for SqliteReportWriter {
    async fn write_pair(&mut self, record: &PairTotalRecord) -> Result<(), ReportWriterError> {
        self.buffer.push(record.clone());
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ReportWriterError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO coplay_totals (player_a, player_b, total_seconds, computed_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for record in &self.buffer {
                stmt.execute(params![
                    record.player_a,
                    record.player_b,
                    record.total_seconds,
                    record.computed_at
                ])?;
            }
        }
        tx.commit()?;

        log::debug!("✅ Flushed {} pair totals to SQLite", self.buffer.len());
        self.buffer.clear();
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
