//! Bulk TSV session dump reader
//!
//! Ingests a tab-separated dump of connection sessions (one row per
//! session, header row naming the columns). Corrupt rows are skipped and
//! counted rather than aborting the run, since large real-world dumps always
//! contain some bad rows. Sessions missing a stop time are still open and
//! are skipped; sessions longer than the configured maximum are treated as
//! stuck-open anomalies and excluded so they cannot dominate overlap sums.

use super::session::Session;
use super::store::SessionStore;
use chrono::DateTime;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug)]
pub enum ReaderError {
    Io(std::io::Error),
    MissingColumn(String),
    EmptyFile,
}

impl From<std::io::Error> for ReaderError {
    fn from(err: std::io::Error) -> Self {
        ReaderError::Io(err)
    }
}

impl std::fmt::Display for ReaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReaderError::Io(e) => write!(f, "IO error: {}", e),
            ReaderError::MissingColumn(c) => write!(f, "Missing column in header: {}", c),
            ReaderError::EmptyFile => write!(f, "Session dump has no header row"),
        }
    }
}

impl std::error::Error for ReaderError {}

/// Per-run ingestion counters, logged by the binary after parsing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReadStats {
    pub parsed: usize,
    pub skipped_open: usize,
    pub skipped_long: usize,
    pub skipped_malformed: usize,
}

impl ReadStats {
    pub fn total_rows(&self) -> usize {
        self.parsed + self.skipped_open + self.skipped_long + self.skipped_malformed
    }
}

struct Columns {
    server_id: usize,
    start_time: usize,
    stop_time: usize,
    player_id: usize,
}

impl Columns {
    fn from_header(header: &str) -> Result<Self, ReaderError> {
        let names: Vec<&str> = header.trim_end_matches(['\r', '\n']).split('\t').collect();
        let find = |name: &str| {
            names
                .iter()
                .position(|&n| n == name)
                .ok_or_else(|| ReaderError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            server_id: find("server_id")?,
            start_time: find("start_time")?,
            stop_time: find("stop_time")?,
            player_id: find("player_id")?,
        })
    }
}

/// Reads session rows from a bulk TSV dump into a `SessionStore`.
pub struct TsvSessionReader {
    max_session_duration_secs: i64,
}

impl TsvSessionReader {
    pub fn new(max_session_duration_secs: i64) -> Self {
        Self {
            max_session_duration_secs,
        }
    }

    pub fn read_into(
        &self,
        path: impl AsRef<Path>,
        store: &mut SessionStore,
    ) -> Result<ReadStats, ReaderError> {
        let file = File::open(path.as_ref())?;
        let mut lines = BufReader::new(file).lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(ReaderError::EmptyFile),
        };
        let columns = Columns::from_header(&header)?;

        let mut stats = ReadStats::default();
        for (line_num, line) in lines.enumerate() {
            let line = line?;
            self.parse_row(&line, &columns, store, &mut stats);

            if (line_num + 1) % 100_000 == 0 {
                log::info!("📥 Parsed {} session rows...", line_num + 1);
            }
        }

        Ok(stats)
    }

    fn parse_row(&self, line: &str, columns: &Columns, store: &mut SessionStore, stats: &mut ReadStats) {
        let fields: Vec<&str> = line.split('\t').collect();

        let field = |idx: usize| fields.get(idx).map(|s| s.trim()).unwrap_or("");

        let server_id: i64 = match field(columns.server_id).parse() {
            Ok(id) if id > 0 => id,
            _ => {
                stats.skipped_malformed += 1;
                return;
            }
        };
        let player_id: i64 = match field(columns.player_id).parse() {
            Ok(id) if id > 0 => id,
            _ => {
                stats.skipped_malformed += 1;
                return;
            }
        };
        let start = match parse_timestamp(field(columns.start_time)) {
            Some(ts) if ts > 0 => ts,
            _ => {
                stats.skipped_malformed += 1;
                return;
            }
        };

        // An empty or unparsable stop time means the session is still open.
        let stop_field = field(columns.stop_time);
        if stop_field.is_empty() {
            stats.skipped_open += 1;
            return;
        }
        let stop = match parse_timestamp(stop_field) {
            Some(ts) if ts > start => ts,
            Some(_) => {
                stats.skipped_malformed += 1;
                return;
            }
            None => {
                stats.skipped_open += 1;
                return;
            }
        };

        if stop - start > self.max_session_duration_secs {
            stats.skipped_long += 1;
            return;
        }

        store.insert(Session::new(start, stop, player_id, server_id));
        stats.parsed += 1;
    }
}

fn parse_timestamp(value: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp())
}
