//! Unified writer interface for coplay reports
//!
//! Routes writes to either the JSONL or SQLite backend based on configuration.

use super::jsonl_writer::JsonlReportWriter;
use super::session::PlayerPairKey;
use super::sqlite_writer::SqliteReportWriter;
use super::writer_backend::{PairTotalRecord, ReportWriterBackend, ReportWriterError};
use crate::config::BackendType;
use std::collections::HashMap;
use std::path::PathBuf;

/// Unified writer that routes to either JSONL or SQLite backend
pub enum ReportWriter {
    Jsonl(JsonlReportWriter),
    Sqlite(SqliteReportWriter),
}

impl ReportWriter {
    /// Create a new report writer based on backend type
    pub fn new(backend: BackendType, base_path: PathBuf) -> Result<Self, ReportWriterError> {
        match backend {
            BackendType::Jsonl => {
                let writer = JsonlReportWriter::new(base_path)?;
                Ok(ReportWriter::Jsonl(writer))
            }
            BackendType::Sqlite => {
                let writer = SqliteReportWriter::new(base_path)?;
                Ok(ReportWriter::Sqlite(writer))
            }
        }
    }

    /// Write every finalized pair total, then flush.
    pub async fn write_report(
        &mut self,
        records: &[PairTotalRecord],
    ) -> Result<(), ReportWriterError> {
        for record in records {
            match self {
                ReportWriter::Jsonl(w) => ReportWriterBackend::write_pair(w, record).await?,
                ReportWriter::Sqlite(w) => w.write_pair(record).await?,
            }
        }
        match self {
            ReportWriter::Jsonl(w) => ReportWriterBackend::flush(w).await,
            ReportWriter::Sqlite(w) => w.flush().await,
        }
    }

    /// Get backend type for logging
    pub fn backend_type(&self) -> &'static str {
        match self {
            ReportWriter::Jsonl(_) => "JSONL",
            ReportWriter::Sqlite(_) => "SQLite",
        }
    }
}

/// Turn finalized totals into report records, largest totals first.
///
/// The sort (descending total, then ascending pair key) is only for
/// reproducible output; totals carry no inherent order.
pub fn sorted_records(
    totals: HashMap<PlayerPairKey, i64>,
    computed_at: i64,
) -> Vec<PairTotalRecord> {
    let mut entries: Vec<(PlayerPairKey, i64)> = totals.into_iter().collect();
    entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    entries
        .into_iter()
        .map(|(key, total_seconds)| PairTotalRecord {
            player_a: key.lo,
            player_b: key.hi,
            total_seconds,
            computed_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_records_descending_by_total() {
        let mut totals = HashMap::new();
        totals.insert(PlayerPairKey::new(1, 2), 5000);
        totals.insert(PlayerPairKey::new(3, 4), 20000);
        totals.insert(PlayerPairKey::new(5, 6), 11000);

        let records = sorted_records(totals, 1700000000);
        let order: Vec<i64> = records.iter().map(|r| r.total_seconds).collect();
        assert_eq!(order, vec![20000, 11000, 5000]);
    }

    #[test]
    fn test_sorted_records_tie_broken_by_pair() {
        let mut totals = HashMap::new();
        totals.insert(PlayerPairKey::new(9, 8), 5000);
        totals.insert(PlayerPairKey::new(1, 2), 5000);

        let records = sorted_records(totals, 0);
        assert_eq!((records[0].player_a, records[0].player_b), (1, 2));
        assert_eq!((records[1].player_a, records[1].player_b), (8, 9));
    }
}
