use serde::{Deserialize, Serialize};

use super::cursor::{After, SortKey, SortOrder, SortValue};
use crate::errors::{Result, SnapqError};
use crate::pattern::{is_simple_match_pattern, ALL_PATTERN};

/// Page size: everything, or at most `n >= 1` snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    #[default]
    Unbounded,
    Limit(usize),
}

impl PageSize {
    pub fn limit(&self) -> Option<usize> {
        match self {
            PageSize::Unbounded => None,
            PageSize::Limit(n) => Some(*n),
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(self, PageSize::Limit(_))
    }

    /// Bound widened by `extra`; used when each repository must supply
    /// enough candidates to cover a global offset
    pub fn widened(&self, extra: usize) -> Self {
        match self {
            PageSize::Unbounded => PageSize::Unbounded,
            PageSize::Limit(n) => PageSize::Limit(n.saturating_add(extra)),
        }
    }
}

/// One listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetSnapshotsRequest {
    /// Repository patterns; `_all`, `*` or empty selects every repository
    pub repositories: Vec<String>,
    /// Snapshot tokens: names, `*` globs, `-exclusions`, `_all`, `_current`
    pub snapshots: Vec<String>,
    /// Policy patterns; `_none` selects snapshots not created by a policy
    pub policies: Vec<String>,
    pub ignore_unavailable: bool,
    /// `false` returns basic descriptors and skips loading
    pub verbose: bool,
    pub sort: SortKey,
    pub order: SortOrder,
    /// Encoded cursor from a previous response's `next`
    pub after: Option<String>,
    pub offset: usize,
    pub size: PageSize,
    /// Legacy inclusive lower (asc) or upper (desc) bound on the sort value
    pub from_sort_value: Option<String>,
}

impl Default for GetSnapshotsRequest {
    fn default() -> Self {
        Self {
            repositories: vec![ALL_PATTERN.to_string()],
            snapshots: vec![ALL_PATTERN.to_string()],
            policies: Vec::new(),
            ignore_unavailable: false,
            verbose: true,
            sort: SortKey::default(),
            order: SortOrder::default(),
            after: None,
            offset: 0,
            size: PageSize::default(),
            from_sort_value: None,
        }
    }
}

impl GetSnapshotsRequest {
    pub fn new<S: Into<String>>(repositories: impl IntoIterator<Item = S>) -> Self {
        Self {
            repositories: repositories.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_snapshots<S: Into<String>>(mut self, snapshots: impl IntoIterator<Item = S>) -> Self {
        self.snapshots = snapshots.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_policies<S: Into<String>>(mut self, policies: impl IntoIterator<Item = S>) -> Self {
        self.policies = policies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort(mut self, sort: SortKey, order: SortOrder) -> Self {
        self.sort = sort;
        self.order = order;
        self
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = PageSize::Limit(size);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_after(mut self, token: impl Into<String>) -> Self {
        self.after = Some(token.into());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = ignore;
        self
    }

    /// Exactly one concrete repository name
    pub fn is_single_repository_request(&self) -> bool {
        match self.repositories.as_slice() {
            [only] => !only.eq_ignore_ascii_case(ALL_PATTERN) && !is_simple_match_pattern(only),
            _ => false,
        }
    }

    /// Decoded `after` cursor, if any
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the token is malformed or its value does not parse
    /// for the requested sort key.
    pub fn parsed_after(&self) -> Result<Option<After>> {
        self.after
            .as_deref()
            .map(|token| After::from_token(token, self.sort))
            .transpose()
    }

    /// Reject option combinations that cannot be served.
    ///
    /// # Errors
    ///
    /// `InvalidInput` with every violated rule listed in the message.
    pub fn validate(&self) -> Result<()> {
        let mut problems: Vec<String> = Vec::new();

        if self.size == PageSize::Limit(0) {
            problems.push("size must be unbounded or greater than 0".to_string());
        }
        if self.after.is_some() && self.offset > 0 {
            problems.push("can't use after and offset simultaneously".to_string());
        }
        if self.after.is_some() && self.from_sort_value.is_some() {
            problems.push("can't use after and from_sort_value simultaneously".to_string());
        }

        if !self.verbose {
            if self.sort != SortKey::default() {
                problems.push(format!("can't use non-default sort [{}] with verbose=false", self.sort));
            }
            if self.order != SortOrder::default() {
                problems.push(format!(
                    "can't use non-default sort order [{}] with verbose=false",
                    self.order.as_str()
                ));
            }
            if self.size.is_bounded() {
                problems.push("can't use size limit with verbose=false".to_string());
            }
            if self.offset > 0 {
                problems.push("can't use offset with verbose=false".to_string());
            }
            if self.after.is_some() {
                problems.push("can't use after with verbose=false".to_string());
            }
            if !self.policies.is_empty() {
                problems.push("can't use slm policy filter with verbose=false".to_string());
            }
            if self.from_sort_value.is_some() {
                problems.push("can't use from_sort_value with verbose=false".to_string());
            }
        }

        if let Err(e) = self.parsed_after() {
            problems.push(e.message().to_string());
        }
        if let Some(raw) = &self.from_sort_value {
            if let Err(e) = SortValue::parse(self.sort, raw) {
                problems.push(e.message().to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(SnapqError::InvalidRequest {
                reason: problems.join("; "),
            }
            .into())
        }
    }
}
