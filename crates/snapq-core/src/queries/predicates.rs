//! Two-tier snapshot filtering.
//!
//! Every filter contributes an optional *preflight* test, evaluated against
//! catalog data before anything is loaded, and an optional *full* test,
//! evaluated against the loaded descriptor. A preflight test never rejects a
//! snapshot its full counterpart would accept, and unknown catalog values
//! always pass preflight.

use super::cursor::{SortKey, SortOrder, SortValue};
use super::request::GetSnapshotsRequest;
use crate::errors::Result;
use crate::model::catalog::UNKNOWN_TIME;
use crate::model::{CatalogView, SnapshotDescriptor, SnapshotIdentity};
use crate::pattern::{split_includes_excludes, PatternSet, NO_POLICY_PATTERN};

/// Policy include/exclude patterns
#[derive(Debug, Clone)]
pub struct PolicyFilter {
    includes: PatternSet,
    excludes: PatternSet,
    match_no_policy: bool,
}

impl PolicyFilter {
    /// `None` when `policies` is empty
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a pattern cannot be compiled.
    pub fn new(policies: &[String]) -> Result<Option<Self>> {
        if policies.is_empty() {
            return Ok(None);
        }
        let (includes, excludes) = split_includes_excludes(policies, |_| false);
        let match_no_policy = includes.iter().any(|p| *p == NO_POLICY_PATTERN);
        Ok(Some(Self {
            includes: PatternSet::new(&includes)?,
            excludes: PatternSet::new(&excludes)?,
            match_no_policy,
        }))
    }

    /// Test one policy value; `None` means "created without a policy"
    pub fn matches_policy(&self, policy: Option<&str>) -> bool {
        match policy {
            None => self.match_no_policy,
            Some(p) => self.includes.is_match(p) && !self.excludes.is_match(p),
        }
    }
}

/// Catalog columns a preflight bound can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogField {
    StartTime,
    Duration,
    IndexCount,
}

impl CatalogField {
    fn read(&self, id: &SnapshotIdentity, catalog: &CatalogView) -> i64 {
        match self {
            CatalogField::StartTime => catalog.start_time(id),
            CatalogField::Duration => catalog.duration(id),
            CatalogField::IndexCount => catalog.index_count(id),
        }
    }
}

/// Test against catalog data only
#[derive(Debug, Clone)]
pub enum PreflightPredicate {
    /// Passes when no policy was recorded
    Policy(PolicyFilter),
    /// Inclusive bound on a catalog column; unknown values pass
    CatalogBound {
        field: CatalogField,
        bound: i64,
        order: SortOrder,
    },
    /// Inclusive bound on the snapshot name
    NameBound { bound: String, order: SortOrder },
}

impl PreflightPredicate {
    pub fn matches(&self, id: &SnapshotIdentity, catalog: &CatalogView) -> bool {
        match self {
            PreflightPredicate::Policy(filter) => match catalog.policy(id) {
                None => true,
                Some(recorded) => filter.matches_policy(recorded),
            },
            PreflightPredicate::CatalogBound { field, bound, order } => {
                let value = field.read(id, catalog);
                let unknown = value == UNKNOWN_TIME && *field != CatalogField::IndexCount;
                unknown || at_or_beyond(value, *bound, *order)
            }
            PreflightPredicate::NameBound { bound, order } => {
                at_or_beyond(id.name.as_str(), bound.as_str(), *order)
            }
        }
    }
}

/// Test against a loaded descriptor
#[derive(Debug, Clone)]
pub enum FullPredicate {
    Policy(PolicyFilter),
    /// Inclusive bound on a numeric sort value, no tie-break
    AtOrBeyond {
        key: SortKey,
        bound: i64,
        order: SortOrder,
    },
    /// Inclusive bound on the snapshot name
    NameAtOrBeyond { bound: String, order: SortOrder },
}

impl FullPredicate {
    pub fn matches(&self, d: &SnapshotDescriptor) -> bool {
        match self {
            FullPredicate::Policy(filter) => filter.matches_policy(d.policy()),
            FullPredicate::AtOrBeyond { key, bound, order } => key
                .numeric_value(d)
                .map_or(true, |v| at_or_beyond(v, *bound, *order)),
            FullPredicate::NameAtOrBeyond { bound, order } => {
                at_or_beyond(d.name(), bound.as_str(), *order)
            }
        }
    }
}

fn at_or_beyond<T: PartialOrd>(value: T, bound: T, order: SortOrder) -> bool {
    match order {
        SortOrder::Asc => value >= bound,
        SortOrder::Desc => value <= bound,
    }
}

/// All filters of one request, split by tier
#[derive(Debug, Clone, Default)]
pub struct SnapshotPredicates {
    preflight: Vec<PreflightPredicate>,
    full: Vec<FullPredicate>,
}

impl SnapshotPredicates {
    /// Match everything
    pub fn none() -> Self {
        Self::default()
    }

    /// Collect the policy and `from_sort_value` filters of `req`.
    ///
    /// The `after` cursor is not a filter here: candidates before it still
    /// count towards `total`, so only the sort pass applies it.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an uncompilable policy pattern or a sort value that
    /// does not parse for the sort key.
    pub fn from_request(req: &GetSnapshotsRequest) -> Result<Self> {
        let mut predicates = Self::default();
        if let Some(filter) = PolicyFilter::new(&req.policies)? {
            predicates.push(
                Some(PreflightPredicate::Policy(filter.clone())),
                Some(FullPredicate::Policy(filter)),
            );
        }
        if let Some(raw) = &req.from_sort_value {
            let (preflight, full) = from_sort_value_filter(req.sort, req.order, raw)?;
            predicates.push(preflight, full);
        }
        Ok(predicates)
    }

    /// Add one filter's contributions
    pub fn push(&mut self, preflight: Option<PreflightPredicate>, full: Option<FullPredicate>) {
        self.preflight.extend(preflight);
        self.full.extend(full);
    }

    pub fn has_preflight(&self) -> bool {
        !self.preflight.is_empty()
    }

    pub fn has_full(&self) -> bool {
        !self.full.is_empty()
    }

    pub fn matches_preflight(&self, id: &SnapshotIdentity, catalog: &CatalogView) -> bool {
        self.preflight.iter().all(|p| p.matches(id, catalog))
    }

    pub fn matches(&self, d: &SnapshotDescriptor) -> bool {
        self.full.iter().all(|p| p.matches(d))
    }
}

/// Legacy inclusive bound without tie-break. Shard counts are unknown until
/// loaded; repository bounds are applied to the repository list instead.
fn from_sort_value_filter(
    key: SortKey,
    order: SortOrder,
    raw: &str,
) -> Result<(Option<PreflightPredicate>, Option<FullPredicate>)> {
    let value = SortValue::parse(key, raw)?;
    let bound = value.as_i64().unwrap_or_default();
    let catalog = |field| {
        Some(PreflightPredicate::CatalogBound { field, bound, order })
    };
    let full = || Some(FullPredicate::AtOrBeyond { key, bound, order });
    Ok(match key {
        SortKey::StartTime => (catalog(CatalogField::StartTime), full()),
        SortKey::Duration => (catalog(CatalogField::Duration), full()),
        SortKey::IndexCount => (catalog(CatalogField::IndexCount), full()),
        SortKey::ShardCount | SortKey::FailedShardCount => (None, full()),
        SortKey::Name => (
            Some(PreflightPredicate::NameBound {
                bound: raw.to_string(),
                order,
            }),
            Some(FullPredicate::NameAtOrBeyond {
                bound: raw.to_string(),
                order,
            }),
        ),
        SortKey::Repository => (None, None),
    })
}
