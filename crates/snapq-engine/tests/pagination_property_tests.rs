// Property tests: cursor paging over a merged multi-repository listing

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::snap;
use proptest::prelude::*;
use snapq_core::{GetSnapshotsRequest, SortKey, SortOrder};
use snapq_engine::commands::coordinator::get_snapshots;
use snapq_engine::QueryContext;
use snapq_store::{InMemoryCluster, InMemoryRepository};

const INDICES: [&str; 4] = ["i1", "i2", "i3", "i4"];

/// (start, duration, index count) per snapshot, for up to three repositories
fn arb_cluster() -> impl Strategy<Value = Vec<Vec<(i64, i64, usize)>>> {
    prop::collection::vec(
        prop::collection::vec((0i64..50, 0i64..20, 1usize..=4), 0..6),
        1..=3,
    )
}

fn build(spec: &[Vec<(i64, i64, usize)>]) -> InMemoryCluster {
    spec.iter()
        .enumerate()
        .fold(InMemoryCluster::new(), |cluster, (r, snapshots)| {
            let repo = format!("repo-{}", r);
            let repository = snapshots.iter().enumerate().fold(
                InMemoryRepository::new(repo.clone()),
                |repository, (s, (start, duration, indices))| {
                    repository.with_snapshot(snap(
                        &repo,
                        &format!("s{}", s),
                        *start,
                        start + duration,
                        &INDICES[..*indices],
                        None,
                    ))
                },
            );
            cluster.with_repository(repository)
        })
}

fn key_strategy() -> impl Strategy<Value = SortKey> {
    prop::sample::select(SortKey::ALL.to_vec())
}

fn order_strategy() -> impl Strategy<Value = SortOrder> {
    prop_oneof![Just(SortOrder::Asc), Just(SortOrder::Desc)]
}

fn keyed(snapshots: &[snapq_core::SnapshotDescriptor]) -> Vec<(String, String)> {
    snapshots
        .iter()
        .map(|d| (d.repository.clone(), d.name().to_string()))
        .collect()
}

proptest! {
    #[test]
    fn prop_cursor_pages_reproduce_unpaged_listing(
        spec in arb_cluster(),
        key in key_strategy(),
        order in order_strategy(),
        size in 1usize..5,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let cluster = build(&spec);
        let ctx = QueryContext::new();

        let full = runtime
            .block_on(get_snapshots(
                &cluster,
                &GetSnapshotsRequest::default().with_sort(key, order),
                &ctx,
            ))
            .unwrap();

        let mut paged = Vec::new();
        let mut after: Option<String> = None;
        let mut first = true;
        loop {
            let mut request = GetSnapshotsRequest::default()
                .with_sort(key, order)
                .with_size(size);
            if let Some(token) = &after {
                request = request.with_after(token.clone());
            }
            let page = runtime.block_on(get_snapshots(&cluster, &request, &ctx)).unwrap();
            prop_assert_eq!(page.total, full.snapshots.len());
            if first {
                prop_assert_eq!(page.remaining + page.snapshots.len(), full.snapshots.len());
                first = false;
            }
            prop_assert!(page.snapshots.len() <= size);
            prop_assert_eq!(page.next.is_some(), page.remaining > 0);
            paged.extend(page.snapshots);
            match page.next {
                Some(token) => after = Some(token),
                None => break,
            }
        }

        prop_assert_eq!(keyed(&paged), keyed(&full.snapshots));
    }

    #[test]
    fn prop_offset_window_is_slice_of_unpaged_listing(
        spec in arb_cluster(),
        key in key_strategy(),
        offset in 0usize..8,
        size in 1usize..5,
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let cluster = build(&spec);
        let ctx = QueryContext::new();

        let full = runtime
            .block_on(get_snapshots(
                &cluster,
                &GetSnapshotsRequest::default().with_sort(key, SortOrder::Asc),
                &ctx,
            ))
            .unwrap();
        let window = runtime
            .block_on(get_snapshots(
                &cluster,
                &GetSnapshotsRequest::default()
                    .with_sort(key, SortOrder::Asc)
                    .with_offset(offset)
                    .with_size(size),
                &ctx,
            ))
            .unwrap();

        let expected: Vec<_> = keyed(&full.snapshots).into_iter().skip(offset).take(size).collect();
        prop_assert_eq!(keyed(&window.snapshots), expected);
        prop_assert_eq!(
            window.remaining,
            full.snapshots.len().saturating_sub(offset).saturating_sub(window.snapshots.len())
        );
    }
}
