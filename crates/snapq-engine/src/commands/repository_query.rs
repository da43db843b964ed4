//! Per-repository pipeline: resolve, filter, load, sort.

use std::collections::{HashMap, HashSet};

use snapq_core::errors::{ExError, ExErrorKind, Result, SnapqError};
use snapq_core::model::RepositoryMetadata;
use snapq_core::pattern::is_current_only;
use snapq_core::queries::{sort_snapshots, KnownSnapshots, PageRequest};
use snapq_core::{
    log_op_end, log_op_error, log_op_start, CatalogView, GetSnapshotsRequest, InFlightEntry,
    SnapshotDescriptor, SnapshotIdentity, SnapshotPredicates, SnapshotRef, SnapshotsInRepo,
};
use snapq_store::ClusterState;

use crate::context::QueryContext;

/// Everything the pipeline needs that is shared by all repositories
#[derive(Debug, Clone, Copy)]
pub struct RepositoryQuery<'a> {
    pub request: &'a GetSnapshotsRequest,
    pub predicates: &'a SnapshotPredicates,
    /// Already widened to this repository's local window
    pub page: &'a PageRequest,
}

/// Run the pipeline for one repository.
///
/// # Errors
///
/// Repository-scoped errors (`SnapshotMissing`, `RepositoryUnavailable`,
/// `SnapshotLoadFailed`, ...) attributed to `repository`, or `Cancelled`.
pub async fn query_repository(
    cluster: &dyn ClusterState,
    repository: &RepositoryMetadata,
    query: RepositoryQuery<'_>,
    ctx: &QueryContext,
) -> Result<SnapshotsInRepo> {
    ctx.checkpoint("repository_query")?;
    log_op_start!(
        "repository_query",
        repository = %repository.name,
        request_id = %ctx.request.request_id
    );
    let start = std::time::Instant::now();

    let result = run(cluster, repository, query, ctx).await;

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(page) => log_op_end!(
            "repository_query",
            duration_ms = elapsed,
            repository = %repository.name,
            returned = page.snapshots.len(),
            remaining = page.remaining
        ),
        Err(e) => {
            let e_clone = e.clone();
            log_op_error!(
                "repository_query",
                e_clone,
                duration_ms = elapsed,
                repository = %repository.name
            );
        }
    }
    result
}

async fn run(
    cluster: &dyn ClusterState,
    repository: &RepositoryMetadata,
    query: RepositoryQuery<'_>,
    ctx: &QueryContext,
) -> Result<SnapshotsInRepo> {
    let name = repository.name.as_str();
    let handle = cluster.repository(name).ok_or_else(|| -> ExError {
        SnapqError::RepositoryMissing {
            repository: name.to_string(),
        }
        .into()
    })?;
    let in_flight = cluster.in_flight(name);

    let catalog = if is_current_only(&query.request.snapshots) {
        None
    } else {
        Some(handle.catalog().await?)
    };

    let mut known = KnownSnapshots::new(name);
    for entry in &in_flight {
        known.insert_in_flight(entry.snapshot_ref());
    }
    // Catalog snapshots failing preflight are unknown to resolution, so a
    // literal name they hide is reported missing.
    if let Some(catalog) = &catalog {
        for id in catalog
            .identities()
            .filter(|id| query.predicates.matches_preflight(id, catalog))
        {
            known.insert_catalog(SnapshotRef::new(name, id.clone()));
        }
    }
    let resolved = known.resolve(&query.request.snapshots, query.request.ignore_unavailable)?;

    let in_flight_by_id: HashMap<&SnapshotIdentity, &InFlightEntry> =
        in_flight.iter().map(|e| (&e.identity, e)).collect();
    let (running, stored): (Vec<&SnapshotRef>, Vec<&SnapshotRef>) = resolved
        .iter()
        .partition(|r| in_flight_by_id.contains_key(&r.identity));
    let running: Vec<&InFlightEntry> = running
        .into_iter()
        .filter_map(|r| in_flight_by_id.get(&r.identity).copied())
        .collect();
    let stored: Vec<SnapshotIdentity> = stored.into_iter().map(|r| r.identity.clone()).collect();

    ctx.checkpoint("repository_query")?;
    let candidates = if query.request.verbose {
        let mut out: Vec<SnapshotDescriptor> = running
            .iter()
            .map(|e| e.to_descriptor())
            .filter(|d| query.predicates.matches(d))
            .collect();
        if !stored.is_empty() {
            let predicates = query.predicates;
            handle
                .load_snapshots(
                    stored,
                    query.request.ignore_unavailable,
                    &ctx.cancel,
                    &mut |d| {
                        if predicates.matches(&d) {
                            out.push(d);
                        }
                    },
                )
                .await?;
        }
        out
    } else {
        if query.predicates.has_full() {
            return Err(ExError::new(ExErrorKind::Internal)
                .with_op("repository_query")
                .with_repository(name)
                .with_message("full predicates cannot be evaluated without loading snapshots"));
        }
        let mut out: Vec<SnapshotDescriptor> =
            running.iter().map(|e| e.to_basic_descriptor()).collect();
        if let Some(catalog) = &catalog {
            out.extend(basic_from_catalog(name, catalog, stored));
        }
        out
    };

    tracing::debug!(
        repository = %name,
        candidate_count = candidates.len(),
        preflight = query.predicates.has_preflight(),
        "candidates ready for sort"
    );
    Ok(sort_snapshots(candidates, query.page))
}

/// Basic descriptors straight from catalog data, with index names from one
/// scan of the index associations
fn basic_from_catalog(
    repository: &str,
    catalog: &CatalogView,
    ids: Vec<SnapshotIdentity>,
) -> Vec<SnapshotDescriptor> {
    let targets: HashSet<&SnapshotIdentity> = ids.iter().collect();
    let mut indices = catalog.indices_for(&targets);
    ids.iter()
        .map(|id| {
            SnapshotDescriptor::basic(
                repository,
                id.clone(),
                indices.remove(id).unwrap_or_default(),
                catalog.state(id),
            )
        })
        .collect()
}
