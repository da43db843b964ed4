//! Engine-level read-only query surface.
//!
//! `apply_engine_query` is the single entry point for snapshot listing.
//! It never mutates a repository or the cluster.

use snapq_core::errors::Result;
use snapq_core::{log_op_end, log_op_error, log_op_start};
use snapq_core::{GetSnapshotsRequest, GetSnapshotsResponse};
use snapq_store::ClusterState;

use crate::commands::coordinator::get_snapshots;
use crate::context::QueryContext;

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// List snapshots across one or more repositories.
    GetSnapshots(GetSnapshotsRequest),
}

/// Result of an `EngineQuery`.
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    GetSnapshots(GetSnapshotsResponse),
}

/// Run a read-only query against the cluster.
///
/// # Errors
///
/// Whatever the query itself fails with; see [`get_snapshots`].
pub async fn apply_engine_query(
    query: EngineQuery,
    cluster: &dyn ClusterState,
    ctx: &QueryContext,
) -> Result<EngineQueryResult> {
    match query {
        EngineQuery::GetSnapshots(request) => {
            log_op_start!(
                "get_snapshots",
                request_id = %ctx.request.request_id,
                trace_id = ctx.request.trace_id_str(),
                repositories = ?request.repositories,
                sort = request.sort.as_str(),
                order = request.order.as_str(),
                verbose = request.verbose
            );
            let start = std::time::Instant::now();

            let result = get_snapshots(cluster, &request, ctx)
                .await
                .map(EngineQueryResult::GetSnapshots);

            let elapsed = start.elapsed().as_millis() as u64;
            match &result {
                Ok(EngineQueryResult::GetSnapshots(response)) => log_op_end!(
                    "get_snapshots",
                    duration_ms = elapsed,
                    returned = response.snapshots.len(),
                    total = response.total,
                    remaining = response.remaining,
                    failures = response.failures.len()
                ),
                Err(e) => {
                    let e_clone = e.clone();
                    log_op_error!("get_snapshots", e_clone, duration_ms = elapsed);
                }
            }
            result
        }
    }
}
