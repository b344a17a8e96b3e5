//! Pipeline orchestration: sequential and bounded-parallel runs
//!
//! Both runners consume a viability-filtered `SessionStore` in ascending-
//! activity schedule order. Each server's session list and accumulator are
//! dropped as soon as its filtered contribution has been merged; global
//! totals are only ever built from fully-computed per-server contributions,
//! so an interrupted job leaves no partial state behind.

use super::aggregator::GlobalCoplayTotals;
use super::overlap::OverlapEngine;
use super::session::{PlayerPairKey, Session};
use super::significance::SignificanceFilter;
use super::store::SessionStore;
use tokio::sync::mpsc;

/// One server's filtered contribution, emitted by a worker.
struct ServerContribution {
    server_id: i64,
    pairs: Vec<(PlayerPairKey, i64)>,
}

fn process_server(
    engine: &OverlapEngine,
    filter: &SignificanceFilter,
    server_id: i64,
    sessions: Vec<Session>,
) -> ServerContribution {
    let session_count = sessions.len();
    let acc = engine.compute(sessions);
    let pair_count = acc.len();
    let pairs = filter.apply(acc);

    log::debug!(
        "server {}: {} sessions, {} pairs, {} significant",
        server_id,
        session_count,
        pair_count,
        pairs.len()
    );

    ServerContribution { server_id, pairs }
}

/// Process every server strictly in schedule order on the current thread.
pub fn run_sequential(
    mut store: SessionStore,
    engine: &OverlapEngine,
    filter: &SignificanceFilter,
) -> GlobalCoplayTotals {
    let mut totals = GlobalCoplayTotals::new();

    for server_id in store.schedule() {
        let sessions = match store.take_server(server_id) {
            Some(sessions) => sessions,
            None => continue,
        };
        let contribution = process_server(engine, filter, server_id, sessions);
        totals.merge(contribution.server_id, contribution.pairs);
    }

    totals
}

/// Process servers with a bounded worker pool.
///
/// A dispatcher feeds servers in schedule order round-robin through
/// capacity-1 channels, so at most one undelivered server per worker is
/// materialized outside the store at any time. Workers emit filtered
/// contributions into a single results channel and the caller merges them
/// in arrival order; merge is commutative and associative, so arrival
/// order does not change the totals.
pub async fn run_parallel(
    mut store: SessionStore,
    engine: &OverlapEngine,
    filter: &SignificanceFilter,
    workers: usize,
) -> GlobalCoplayTotals {
    let workers = workers.max(1);
    let server_count = store.schedule().len();
    let (result_tx, mut result_rx) = mpsc::channel::<ServerContribution>(workers);

    let mut work_txs = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);

    for _ in 0..workers {
        let (work_tx, mut work_rx) = mpsc::channel::<(i64, Vec<Session>)>(1);
        let result_tx = result_tx.clone();
        let engine = engine.clone();
        let filter = filter.clone();

        handles.push(tokio::spawn(async move {
            while let Some((server_id, sessions)) = work_rx.recv().await {
                let contribution = process_server(&engine, &filter, server_id, sessions);
                if result_tx.send(contribution).await.is_err() {
                    return;
                }
            }
        }));
        work_txs.push(work_tx);
    }
    drop(result_tx);

    let schedule = store.schedule();
    let dispatcher = tokio::spawn(async move {
        for (i, server_id) in schedule.into_iter().enumerate() {
            let sessions = match store.take_server(server_id) {
                Some(sessions) => sessions,
                None => continue,
            };
            if work_txs[i % work_txs.len()]
                .send((server_id, sessions))
                .await
                .is_err()
            {
                return;
            }
        }
        // Dropping the senders lets the workers drain and exit.
    });

    let mut totals = GlobalCoplayTotals::new();
    while let Some(contribution) = result_rx.recv().await {
        totals.merge(contribution.server_id, contribution.pairs);
    }

    let _ = dispatcher.await;
    for handle in handles {
        let _ = handle.await;
    }

    debug_assert_eq!(totals.merged_server_count(), server_count);
    totals
}
