//! Sorting, cursor continuation and offset/size pagination.

use std::cmp::Ordering;

use serde::Serialize;

use super::cursor::{After, Cursor, SortKey, SortOrder};
use super::request::{GetSnapshotsRequest, PageSize};
use crate::errors::Result;
use crate::model::SnapshotDescriptor;

/// Ascending comparison under `key`.
///
/// Numeric keys tie-break by repository then name; `name` tie-breaks by
/// repository; `repository` tie-breaks by name. Since `(repository, name)` is
/// unique in a response this is a total order.
pub fn compare(key: SortKey, a: &SnapshotDescriptor, b: &SnapshotDescriptor) -> Ordering {
    let by_repository_then_name = || {
        a.repository
            .cmp(&b.repository)
            .then_with(|| a.identity.name.cmp(&b.identity.name))
    };
    match key {
        SortKey::Name => a
            .identity
            .name
            .cmp(&b.identity.name)
            .then_with(|| a.repository.cmp(&b.repository)),
        SortKey::Repository => by_repository_then_name(),
        numeric => numeric
            .numeric_value(a)
            .cmp(&numeric.numeric_value(b))
            .then_with(by_repository_then_name),
    }
}

/// Ordering, cursor and window for one sort pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub sort: SortKey,
    pub order: SortOrder,
    pub after: Option<After>,
    pub offset: usize,
    pub size: PageSize,
}

impl PageRequest {
    /// # Errors
    ///
    /// `InvalidInput` if the request's cursor does not decode.
    pub fn from_request(req: &GetSnapshotsRequest) -> Result<Self> {
        Ok(Self {
            sort: req.sort,
            order: req.order,
            after: req.parsed_after()?,
            offset: req.offset,
            size: req.size,
        })
    }

    /// Window one repository must produce so that the merged result can still
    /// apply the global offset and size
    pub fn per_repository(&self) -> Self {
        Self {
            offset: 0,
            size: self.size.widened(self.offset),
            ..self.clone()
        }
    }

    pub fn cursor_for(&self, d: &SnapshotDescriptor) -> Cursor {
        Cursor::from_descriptor(d, self.sort)
    }
}

/// One sorted page plus counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotsInRepo {
    pub snapshots: Vec<SnapshotDescriptor>,
    /// Candidates handed to the sort pass
    pub total_count: usize,
    /// Candidates after cursor and offset that did not fit the page
    pub remaining: usize,
}

impl SnapshotsInRepo {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Filter by cursor, sort, skip `offset`, cut to `size`.
pub fn sort_snapshots(candidates: Vec<SnapshotDescriptor>, page: &PageRequest) -> SnapshotsInRepo {
    let total_count = candidates.len();
    let mut kept: Vec<SnapshotDescriptor> = match &page.after {
        Some(after) => candidates
            .into_iter()
            .filter(|d| after.matches(page.order, d))
            .collect(),
        None => candidates,
    };
    kept.sort_by(|a, b| page.order.apply(compare(page.sort, a, b)));

    let after_offset = kept.len().saturating_sub(page.offset);
    let mut snapshots: Vec<SnapshotDescriptor> = kept.into_iter().skip(page.offset).collect();
    if let Some(limit) = page.size.limit() {
        snapshots.truncate(limit);
    }
    SnapshotsInRepo {
        remaining: after_offset - snapshots.len(),
        snapshots,
        total_count,
    }
}
