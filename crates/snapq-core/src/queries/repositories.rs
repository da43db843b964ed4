//! Repository selection for a request.

use super::cursor::{SortKey, SortOrder};
use crate::errors::{ExError, Result, SnapqError};
use crate::model::RepositoryMetadata;
use crate::pattern::{is_match_all, is_simple_match_pattern, split_includes_excludes, PatternSet};

/// Repositories selected for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedRepositories {
    /// Registered repositories that matched, in registry order
    pub repositories: Vec<RepositoryMetadata>,
    /// Literal names that are not registered
    pub missing: Vec<String>,
}

impl ResolvedRepositories {
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.missing.is_empty()
    }

    /// One `RepositoryMissing` error per missing name
    pub fn missing_errors(&self) -> Vec<(String, ExError)> {
        self.missing
            .iter()
            .map(|name| {
                let err = SnapqError::RepositoryMissing {
                    repository: name.clone(),
                }
                .into();
                (name.clone(), err)
            })
            .collect()
    }
}

/// Select registered repositories by pattern.
///
/// # Errors
///
/// `InvalidInput` if a pattern cannot be compiled.
pub fn resolve_repositories(
    registered: &[RepositoryMetadata],
    patterns: &[String],
) -> Result<ResolvedRepositories> {
    if is_match_all(patterns) {
        return Ok(ResolvedRepositories {
            repositories: registered.to_vec(),
            missing: Vec::new(),
        });
    }
    let (includes, excludes) = split_includes_excludes(patterns, |_| false);
    let missing: Vec<String> = includes
        .iter()
        .filter(|p| !is_simple_match_pattern(p))
        .filter(|literal| !registered.iter().any(|r| r.name == **literal))
        .map(|literal| literal.to_string())
        .collect();
    let includes = PatternSet::new(&includes)?;
    let excludes = PatternSet::new(&excludes)?;
    Ok(ResolvedRepositories {
        repositories: registered
            .iter()
            .filter(|r| includes.is_match(&r.name) && !excludes.is_match(&r.name))
            .cloned()
            .collect(),
        missing,
    })
}

/// Drop repositories entirely before `from_sort_value` when sorting by
/// repository name. Other sort keys leave the list untouched.
pub fn filter_by_from_sort_value(
    repositories: Vec<RepositoryMetadata>,
    sort: SortKey,
    order: SortOrder,
    from_sort_value: Option<&str>,
) -> Vec<RepositoryMetadata> {
    match (sort, from_sort_value) {
        (SortKey::Repository, Some(from)) => repositories
            .into_iter()
            .filter(|r| match order {
                SortOrder::Asc => from <= r.name.as_str(),
                SortOrder::Desc => from >= r.name.as_str(),
            })
            .collect(),
        _ => repositories,
    }
}
