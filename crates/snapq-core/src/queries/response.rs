use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::ExError;
use crate::model::SnapshotDescriptor;

/// Result of one listing request.
///
/// `next` is present exactly when `remaining > 0`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetSnapshotsResponse {
    pub snapshots: Vec<SnapshotDescriptor>,
    /// Repository name to the error that excluded it
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, ExError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub total: usize,
    pub remaining: usize,
}

impl GetSnapshotsResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Some repositories failed but the request as a whole succeeded
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.snapshots.iter().map(|d| d.name()).collect()
    }
}
