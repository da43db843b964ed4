//! Sort / Cursor / Pagination Tests
//!
//! ## Scenarios Covered
//!
//! 1. Every sort key orders with the documented tie-breaks
//! 2. Offset and size windows report remaining counts
//! 3. Cursor continuation pages through a result set with no gap and no overlap
//! 4. Property: remaining + page length == candidates after cursor - offset

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::descriptor;
use proptest::prelude::*;
use snapq_core::queries::{sort_snapshots, After, PageRequest};
use snapq_core::{Cursor, PageSize, SnapshotDescriptor, SortKey, SortOrder};

fn sample() -> Vec<SnapshotDescriptor> {
    vec![
        descriptor("r2", "b", 30, 60, &["i1"], None),
        descriptor("r1", "c", 10, 15, &["i1", "i2", "i3"], None),
        descriptor("r1", "a", 20, 40, &["i1", "i2"], None),
        descriptor("r2", "a", 10, 30, &[], None),
    ]
}

fn refs(page: &[SnapshotDescriptor]) -> Vec<String> {
    page.iter()
        .map(|d| format!("{}:{}", d.repository, d.name()))
        .collect()
}

fn sorted_by(key: SortKey, order: SortOrder) -> Vec<String> {
    let page = PageRequest {
        sort: key,
        order,
        ..Default::default()
    };
    refs(&sort_snapshots(sample(), &page).snapshots)
}

// --- ordering ---

#[test]
fn test_start_time_ties_break_by_repository_then_name() {
    assert_eq!(
        sorted_by(SortKey::StartTime, SortOrder::Asc),
        vec!["r1:c", "r2:a", "r1:a", "r2:b"]
    );
}

#[test]
fn test_name_ties_break_by_repository() {
    assert_eq!(
        sorted_by(SortKey::Name, SortOrder::Asc),
        vec!["r1:a", "r2:a", "r2:b", "r1:c"]
    );
    assert_eq!(
        sorted_by(SortKey::Name, SortOrder::Desc),
        vec!["r1:c", "r2:b", "r2:a", "r1:a"]
    );
}

#[test]
fn test_repository_then_name() {
    assert_eq!(
        sorted_by(SortKey::Repository, SortOrder::Asc),
        vec!["r1:a", "r1:c", "r2:a", "r2:b"]
    );
}

#[test]
fn test_duration_and_index_count() {
    assert_eq!(
        sorted_by(SortKey::Duration, SortOrder::Asc),
        vec!["r1:c", "r1:a", "r2:a", "r2:b"]
    );
    assert_eq!(
        sorted_by(SortKey::IndexCount, SortOrder::Desc),
        vec!["r1:c", "r1:a", "r2:b", "r2:a"]
    );
}

// --- windows ---

#[test]
fn test_unbounded_page_has_no_remaining() {
    let result = sort_snapshots(sample(), &PageRequest::default());
    assert_eq!(result.snapshots.len(), 4);
    assert_eq!(result.remaining, 0);
    assert_eq!(result.total_count, 4);
}

#[test]
fn test_bounded_page_counts_everything_beyond_it() {
    let page = PageRequest {
        size: PageSize::Limit(1),
        ..Default::default()
    };
    let result = sort_snapshots(sample(), &page);
    assert_eq!(refs(&result.snapshots), vec!["r1:c"]);
    assert_eq!(result.remaining, 3);
}

#[test]
fn test_cursor_excludes_cursor_position_itself() {
    let all = sort_snapshots(sample(), &PageRequest::default()).snapshots;
    let cursor = Cursor::from_descriptor(&all[1], SortKey::StartTime);
    let page = PageRequest {
        after: Some(After::new(&cursor, SortKey::StartTime).unwrap()),
        ..Default::default()
    };
    let result = sort_snapshots(sample(), &page);
    assert_eq!(refs(&result.snapshots), vec!["r1:a", "r2:b"]);
    assert_eq!(result.total_count, 4);
}

// --- properties ---

fn arb_candidates() -> impl Strategy<Value = Vec<SnapshotDescriptor>> {
    prop::collection::btree_map(
        (prop::sample::select(vec!["r1", "r2", "r3"]), "[a-e]{1,2}"),
        (0i64..5, 0i64..5, 0usize..4),
        0..20,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .map(|((repo, name), (start, len, index_count))| {
                let indices: Vec<String> = (0..index_count).map(|i| format!("i{}", i)).collect();
                let indices: Vec<&str> = indices.iter().map(String::as_str).collect();
                descriptor(repo, &name, start, start + len, &indices, None)
            })
            .collect()
    })
}

fn arb_key_order() -> impl Strategy<Value = (SortKey, SortOrder)> {
    (
        prop::sample::select(SortKey::ALL.to_vec()),
        prop::sample::select(vec![SortOrder::Asc, SortOrder::Desc]),
    )
}

proptest! {
    #[test]
    fn prop_cursor_pages_cover_everything_once(
        candidates in arb_candidates(),
        (key, order) in arb_key_order(),
        size in 1usize..5,
    ) {
        let expected = refs(
            &sort_snapshots(candidates.clone(), &PageRequest { sort: key, order, ..Default::default() }).snapshots,
        );

        let mut seen: Vec<String> = Vec::new();
        let mut after: Option<After> = None;
        loop {
            let page = PageRequest {
                sort: key,
                order,
                after: after.clone(),
                offset: 0,
                size: PageSize::Limit(size),
            };
            let result = sort_snapshots(candidates.clone(), &page);
            seen.extend(refs(&result.snapshots));
            if result.remaining == 0 {
                break;
            }
            let last = result.snapshots.last().unwrap();
            let token = Cursor::from_descriptor(last, key).encode();
            after = Some(After::from_token(&token, key).unwrap());
        }
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn prop_remaining_plus_page_matches_window(
        candidates in arb_candidates(),
        (key, order) in arb_key_order(),
        offset in 0usize..25,
        size in prop::option::of(1usize..6),
    ) {
        let page = PageRequest {
            sort: key,
            order,
            after: None,
            offset,
            size: size.map_or(PageSize::Unbounded, PageSize::Limit),
        };
        let total = candidates.len();
        let result = sort_snapshots(candidates, &page);
        prop_assert_eq!(result.total_count, total);
        prop_assert_eq!(
            result.remaining + result.snapshots.len(),
            total.saturating_sub(offset)
        );
        if let Some(limit) = size {
            prop_assert!(result.snapshots.len() <= limit);
        }
    }

    #[test]
    fn prop_sorted_output_is_monotonic(
        candidates in arb_candidates(),
        (key, order) in arb_key_order(),
    ) {
        let page = PageRequest { sort: key, order, ..Default::default() };
        let result = sort_snapshots(candidates, &page);
        for pair in result.snapshots.windows(2) {
            let ordering = order.apply(snapq_core::queries::compare(key, &pair[0], &pair[1]));
            prop_assert_eq!(ordering, std::cmp::Ordering::Less);
        }
    }
}
