//! Resolve snapshot tokens against the snapshots one repository knows about.

use std::collections::{BTreeSet, HashMap};

use crate::errors::{Result, SnapqError};
use crate::model::SnapshotRef;
use crate::pattern::{
    is_current_only, is_match_all, is_simple_match_pattern, PatternSet, CURRENT_SNAPSHOT,
};

/// Snapshot names known to one repository for the current request.
///
/// Built from the catalog first and then overwritten by in-flight entries, so
/// an in-flight snapshot always wins a name collision.
#[derive(Debug, Clone, Default)]
pub struct KnownSnapshots {
    repository: String,
    by_name: HashMap<String, SnapshotRef>,
    in_flight: Vec<SnapshotRef>,
}

impl KnownSnapshots {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Default::default()
        }
    }

    /// Record a catalog snapshot unless an in-flight entry already owns the name
    pub fn insert_catalog(&mut self, snapshot: SnapshotRef) {
        self.by_name
            .entry(snapshot.name().to_string())
            .or_insert(snapshot);
    }

    /// Record an in-flight snapshot, replacing any catalog entry of the same name
    pub fn insert_in_flight(&mut self, snapshot: SnapshotRef) {
        self.by_name
            .insert(snapshot.name().to_string(), snapshot.clone());
        self.in_flight.push(snapshot);
    }

    /// Resolve `tokens` to concrete snapshots.
    ///
    /// Tokens are processed left to right. `_all`, `*` or an empty list select
    /// everything known. `_current` selects every in-flight snapshot. A token
    /// `-p` is an exclusion only after a wildcard or `_current`.
    ///
    /// # Errors
    ///
    /// `SnapshotMissing` for a literal name that is not known, or when
    /// nothing resolves, unless `ignore_unavailable` is set or the request
    /// asked only for `_current`.
    pub fn resolve(&self, tokens: &[String], ignore_unavailable: bool) -> Result<BTreeSet<SnapshotRef>> {
        if is_match_all(tokens) {
            return Ok(self.by_name.values().cloned().collect());
        }

        let mut includes: Vec<&str> = Vec::new();
        let mut excludes: Vec<&str> = Vec::new();
        let mut seen_wildcard = false;
        let mut wants_current = false;
        for token in tokens {
            if seen_wildcard && token.len() > 1 && token.starts_with('-') {
                excludes.push(&token[1..]);
            } else if is_simple_match_pattern(token) {
                seen_wildcard = true;
                includes.push(token);
            } else if token.eq_ignore_ascii_case(CURRENT_SNAPSHOT) {
                seen_wildcard = true;
                wants_current = true;
            } else {
                if !ignore_unavailable && !self.by_name.contains_key(token.as_str()) {
                    return Err(self.missing(token));
                }
                includes.push(token);
            }
        }

        let includes = PatternSet::new(&includes)?;
        let excludes = PatternSet::new(&excludes)?;

        let mut resolved: BTreeSet<SnapshotRef> = self
            .by_name
            .iter()
            .filter(|(name, _)| includes.is_match(name) && !excludes.is_match(name))
            .map(|(_, snapshot)| snapshot.clone())
            .collect();
        if wants_current {
            resolved.extend(
                self.in_flight
                    .iter()
                    .filter(|s| !excludes.is_match(s.name()))
                    .cloned(),
            );
        }

        if resolved.is_empty() && !ignore_unavailable && !is_current_only(tokens) {
            return Err(self.missing(&tokens[0]));
        }
        Ok(resolved)
    }

    fn missing(&self, snapshot: &str) -> crate::errors::ExError {
        SnapqError::SnapshotMissing {
            repository: self.repository.clone(),
            snapshot: snapshot.to_string(),
        }
        .into()
    }
}
