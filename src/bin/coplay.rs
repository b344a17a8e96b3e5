//! Coplay Binary - Batch Coplay Time Aggregation
//!
//! Computes, for every pair of players, the cumulative time they were
//! simultaneously connected to the same server, over a bulk session dump.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin coplay -- --input tsv --backend jsonl
//! ```
//!
//! ## Environment Variables
//!
//! - SESSIONS_TSV_PATH - Bulk TSV session dump (default: data/sessions.tsv) - used when --input tsv
//! - SESSIONS_DB_PATH - Crawled session database (default: data/sessions.db) - used when --input sqlite
//! - COPLAY_OUTPUT_PATH - Report destination (default: streams/coplay or data/coplay.db)
//! - MAX_SESSION_DURATION_SECS - Anomalous session cutoff (default: 86400)
//! - MIN_SERVER_SESSIONS - Server viability minimum (default: 2)
//! - SIGNIFICANCE_THRESHOLD_SECS - Per-server pair retention threshold (default: 10800)
//! - DISABLE_SIGNIFICANCE_FILTER - Keep every pair, at higher memory cost (default: false)
//! - INCLUDE_SELF_PAIRS - Count same-player reconnect overlap (default: false)
//! - WORKER_COUNT - Parallel overlap workers, 1 = sequential (default: 1)
//! - RUST_LOG - Logging level (optional, default: info)

use chrono::Utc;
use coplay::config::{CoplayConfig, InputSource};
use coplay::coplay_core::{
    run_parallel, run_sequential, sorted_records, OverlapEngine, ReportWriter, SessionStore,
    SignificanceFilter, SqliteSessionReader, TsvSessionReader,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = CoplayConfig::from_env()?;

    log::info!("🚀 Starting coplay aggregation");
    log::info!("   Input: {:?}", config.input);
    log::info!("   Output: {}", config.output_path.display());
    log::info!("   Max session duration: {}s", config.max_session_duration_secs);
    log::info!("   Viability minimum: {} sessions", config.min_server_sessions);
    if config.disable_significance_filter {
        log::info!("   Significance filter: disabled (high-fidelity run)");
    } else {
        log::info!(
            "   Significance threshold: {}s",
            config.significance_threshold_secs
        );
    }
    log::info!("   Workers: {}", config.worker_count);

    // Ingest sessions into the store.
    let mut store = SessionStore::new();
    match config.input {
        InputSource::Tsv => {
            log::info!(
                "📖 Reading session dump: {}",
                config.sessions_tsv_path.display()
            );
            let reader = TsvSessionReader::new(config.max_session_duration_secs);
            let stats = reader.read_into(&config.sessions_tsv_path, &mut store)?;

            log::info!("✅ Done parsing {} sessions", stats.parsed);
            log::info!("   Distinct servers detected: {}", store.server_count());
            if stats.total_rows() > 0 {
                let filtered_percent =
                    100.0 * stats.skipped_long as f64 / stats.total_rows() as f64;
                log::info!(
                    "   Filtered {} excessively long sessions ({:.2}%)",
                    stats.skipped_long,
                    filtered_percent
                );
            }
            log::info!(
                "   Skipped {} open and {} malformed rows",
                stats.skipped_open,
                stats.skipped_malformed
            );
        }
        InputSource::Sqlite => {
            log::info!(
                "📖 Reading session database: {}",
                config.sessions_db_path.display()
            );
            let mut reader = SqliteSessionReader::new(
                &config.sessions_db_path,
                config.max_session_duration_secs,
            )?;
            let total = reader.read_all(&mut store)?;
            log::info!("✅ Read {} sessions", total);
            log::info!("   Distinct servers detected: {}", store.server_count());
        }
    }

    // Drop servers that cannot produce any overlap.
    let removed = store.retain_viable(config.min_server_sessions);
    log::info!(
        "🧹 Dropped {} non-viable servers, {} remain",
        removed,
        store.server_count()
    );

    let engine = OverlapEngine::new(config.include_self_pairs);
    let filter = if config.disable_significance_filter {
        SignificanceFilter::disabled()
    } else {
        SignificanceFilter::new(config.significance_threshold_secs)
    };

    log::info!("⏱️  Computing coplay totals...");
    let totals = if config.worker_count > 1 {
        run_parallel(store, &engine, &filter, config.worker_count).await
    } else {
        run_sequential(store, &engine, &filter)
    };

    let servers_processed = totals.merged_server_count();
    let pair_count = totals.pair_count();

    let records = sorted_records(totals.into_totals(), Utc::now().timestamp());
    let mut writer = ReportWriter::new(config.backend, config.output_path.clone())?;
    log::info!("📊 Backend: {}", writer.backend_type());
    writer.write_report(&records).await?;

    log::info!(
        "✅ Coplay aggregation complete: {} servers processed, {} significant pairs",
        servers_processed,
        pair_count
    );
    if let Some(top) = records.first() {
        log::info!(
            "   Top pair: players {} and {} with {}s together",
            top.player_a,
            top.player_b,
            top.total_seconds
        );
    }

    Ok(())
}
