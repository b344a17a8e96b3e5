//! Shared SQLite PRAGMA tuning applied to every connection the job opens.

use rusqlite::Connection;

/// Apply the standard PRAGMA set: WAL journaling, relaxed (but safe)
/// synchronization, in-memory temp storage, and a larger page cache.
pub fn apply_optimized_pragmas(conn: &Connection) -> Result<(), rusqlite::Error> {
    // journal_mode reports the resulting mode back as a row.
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    conn.pragma_update(None, "cache_size", -64000)?;
    Ok(())
}
