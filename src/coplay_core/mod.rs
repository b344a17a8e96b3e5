//! Coplay Core - Per-Server Overlap Aggregation Engine
//!
//! This module computes, for every pair of players, the cumulative time they
//! were simultaneously connected to the same server, over bulk session dumps
//! with tens of millions of records.
//!
//! # Architecture
//!
//! ```text
//! TSV dump / SQLite database → TsvSessionReader / SqliteSessionReader
//!     ↓
//! SessionStore (group by server, drop non-viable servers,
//!               schedule ascending by activity)
//!     ↓ per server, smallest first
//! OverlapEngine (sweep line over start-sorted sessions)
//!     ↓
//! SignificanceFilter (per-server minimum pair duration)
//!     ↓
//! GlobalCoplayTotals (single-writer additive merge)
//!     ↓
//! ReportWriter → JSONL or SQLite backend
//! ```
//!
//! Memory stays bounded because each server's session list and accumulator
//! are dropped as soon as its filtered contribution merges, servers are
//! processed smallest-first, and insignificant pairs never leave per-server
//! scope.

pub mod aggregator;
pub mod jsonl_writer;
pub mod overlap;
pub mod runner;
pub mod session;
pub mod significance;
pub mod sqlite_reader;
pub mod sqlite_writer;
pub mod store;
pub mod tsv_reader;
pub mod writer;
pub mod writer_backend;

pub use aggregator::GlobalCoplayTotals;
pub use jsonl_writer::JsonlReportWriter;
pub use overlap::OverlapEngine;
pub use runner::{run_parallel, run_sequential};
pub use session::{CoplayAccumulator, PlayerPairKey, Session};
pub use significance::{SignificanceFilter, DEFAULT_SIGNIFICANCE_THRESHOLD_SECS};
pub use sqlite_reader::SqliteSessionReader;
pub use sqlite_writer::SqliteReportWriter;
pub use store::SessionStore;
pub use tsv_reader::{ReadStats, ReaderError, TsvSessionReader};
pub use writer::{sorted_records, ReportWriter};
pub use writer_backend::{PairTotalRecord, ReportWriterBackend, ReportWriterError};
