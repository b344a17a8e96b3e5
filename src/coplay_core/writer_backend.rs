//! Writer backend trait for coplay report records
//!
//! Defines the interface for writing finalized pair totals to different backends.

use async_trait::async_trait;
use serde::Serialize;

/// One finalized player pair with its cumulative coplay time.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PairTotalRecord {
    pub player_a: i64,
    pub player_b: i64,
    pub total_seconds: i64,
    pub computed_at: i64,
}

#[derive(Debug)]
pub enum ReportWriterError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Database(String),
}

impl From<std::io::Error> for ReportWriterError {
    fn from(err: std::io::Error) -> Self {
        ReportWriterError::Io(err)
    }
}

impl From<serde_json::Error> for ReportWriterError {
    fn from(err: serde_json::Error) -> Self {
        ReportWriterError::Serialization(err)
    }
}

impl From<rusqlite::Error> for ReportWriterError {
    fn from(err: rusqlite::Error) -> Self {
        ReportWriterError::Database(err.to_string())
    }
}

impl std::fmt::Display for ReportWriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWriterError::Io(e) => write!(f, "IO error: {}", e),
            ReportWriterError::Serialization(e) => write!(f, "Serialization error: {}", e),
            ReportWriterError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ReportWriterError {}

/// Backend trait for writing coplay pair totals
#[async_trait]
pub trait ReportWriterBackend: Send {
    /// Write a single pair total record
    async fn write_pair(&mut self, record: &PairTotalRecord) -> Result<(), ReportWriterError>;

    /// Flush pending writes to storage
    async fn flush(&mut self) -> Result<(), ReportWriterError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
