//! Multi-repository fan-out and merge.

use std::collections::BTreeMap;

use futures::future::join_all;
use snapq_core::errors::{ExError, Result};
use snapq_core::queries::{
    filter_by_from_sort_value, resolve_repositories, sort_snapshots, PageRequest,
};
use snapq_core::{GetSnapshotsRequest, GetSnapshotsResponse, SnapshotPredicates, SnapshotsInRepo};
use snapq_store::ClusterState;

use crate::commands::repository_query::{query_repository, RepositoryQuery};
use crate::context::QueryContext;

/// List snapshots across every repository the request selects.
///
/// Repositories are queried concurrently. In a multi-repository request a
/// repository-scoped failure lands in `failures` and the remaining
/// repositories still contribute; a single-repository request returns the
/// error instead. Cancellation and invalid input always fail the request.
///
/// # Errors
///
/// `InvalidInput` for a rejected request, `Cancelled` if the token fires,
/// or the repository's own error for a single-repository request.
pub async fn get_snapshots(
    cluster: &dyn ClusterState,
    request: &GetSnapshotsRequest,
    ctx: &QueryContext,
) -> Result<GetSnapshotsResponse> {
    request.validate()?;
    let predicates = SnapshotPredicates::from_request(request)?;
    let page = PageRequest::from_request(request)?;
    let single_repository = request.is_single_repository_request();

    let resolved = resolve_repositories(&cluster.repositories(), &request.repositories)?;
    let mut failures: BTreeMap<String, ExError> = BTreeMap::new();
    for (name, err) in resolved.missing_errors() {
        if single_repository {
            return Err(err);
        }
        failures.insert(name, err);
    }
    let repositories = filter_by_from_sort_value(
        resolved.repositories,
        request.sort,
        request.order,
        request.from_sort_value.as_deref(),
    );
    if repositories.is_empty() {
        return Ok(GetSnapshotsResponse {
            failures,
            ..GetSnapshotsResponse::empty()
        });
    }

    let local_page = page.per_repository();
    let query = RepositoryQuery {
        request,
        predicates: &predicates,
        page: &local_page,
    };
    let results = join_all(
        repositories
            .iter()
            .map(|repository| query_repository(cluster, repository, query, ctx)),
    )
    .await;
    ctx.checkpoint("get_snapshots")?;

    let mut pages: Vec<SnapshotsInRepo> = Vec::with_capacity(results.len());
    for (repository, result) in repositories.iter().zip(results) {
        match result {
            Ok(page) => pages.push(page),
            Err(e) if !single_repository && e.is_repository_scoped() => {
                failures.insert(repository.name.clone(), e);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(merge(pages, &page, failures))
}

/// Merge per-repository pages under the global window.
///
/// `total` sums the per-repository candidate counts; `remaining` adds what
/// each repository held back to what the global cut drops.
fn merge(
    pages: Vec<SnapshotsInRepo>,
    page: &PageRequest,
    failures: BTreeMap<String, ExError>,
) -> GetSnapshotsResponse {
    let total: usize = pages.iter().map(|p| p.total_count).sum();
    let held_back: usize = pages.iter().map(|p| p.remaining).sum();
    let merged: Vec<_> = pages.into_iter().flat_map(|p| p.snapshots).collect();

    let global = sort_snapshots(merged, page);
    let remaining = global.remaining + held_back;
    let next = if remaining > 0 {
        global
            .snapshots
            .last()
            .map(|last| page.cursor_for(last).encode())
    } else {
        None
    };

    GetSnapshotsResponse {
        snapshots: global.snapshots,
        failures,
        next,
        total,
        remaining,
    }
}
