use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identity::{SnapshotIdentity, SnapshotRef};

/// User-metadata key holding the name of the policy that created a snapshot
pub const POLICY_METADATA_FIELD: &str = "policy";

/// Lifecycle state of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotState {
    InProgress,
    Success,
    Failed,
    Partial,
    Incompatible,
}

/// Detail only available once a snapshot has been fully loaded
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotDetails {
    /// Epoch millis
    pub start_time: i64,
    /// Epoch millis; 0 while in progress
    pub end_time: i64,
    pub total_shards: u32,
    pub failed_shards: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<Map<String, Value>>,
}

/// A snapshot as returned to the caller.
///
/// `details` is `None` for the basic variant built straight from catalog data
/// or from an in-flight entry in non-verbose mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDescriptor {
    pub repository: String,
    #[serde(flatten)]
    pub identity: SnapshotIdentity,
    /// Sorted, deduplicated
    pub indices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SnapshotState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<SnapshotDetails>,
}

impl SnapshotDescriptor {
    /// Basic descriptor: identity, indices and state only
    pub fn basic(
        repository: impl Into<String>,
        identity: SnapshotIdentity,
        indices: impl IntoIterator<Item = String>,
        state: Option<SnapshotState>,
    ) -> Self {
        Self {
            repository: repository.into(),
            identity,
            indices: normalize_indices(indices),
            state,
            details: None,
        }
    }

    /// Full descriptor with loaded details
    pub fn full(
        repository: impl Into<String>,
        identity: SnapshotIdentity,
        indices: impl IntoIterator<Item = String>,
        state: SnapshotState,
        details: SnapshotDetails,
    ) -> Self {
        Self {
            repository: repository.into(),
            identity,
            indices: normalize_indices(indices),
            state: Some(state),
            details: Some(details),
        }
    }

    /// Drop loaded details, keeping the basic projection
    pub fn to_basic(&self) -> Self {
        Self {
            details: None,
            ..self.clone()
        }
    }

    pub fn is_basic(&self) -> bool {
        self.details.is_none()
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn snapshot_ref(&self) -> SnapshotRef {
        SnapshotRef::new(self.repository.clone(), self.identity.clone())
    }

    pub fn start_time(&self) -> i64 {
        self.details.as_ref().map_or(0, |d| d.start_time)
    }

    pub fn end_time(&self) -> i64 {
        self.details.as_ref().map_or(0, |d| d.end_time)
    }

    pub fn duration(&self) -> i64 {
        self.end_time() - self.start_time()
    }

    pub fn index_count(&self) -> i64 {
        self.indices.len() as i64
    }

    pub fn total_shards(&self) -> i64 {
        self.details.as_ref().map_or(0, |d| i64::from(d.total_shards))
    }

    pub fn failed_shards(&self) -> i64 {
        self.details.as_ref().map_or(0, |d| i64::from(d.failed_shards))
    }

    /// Policy recorded in user metadata; non-string values count as none
    pub fn policy(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|d| d.user_metadata.as_ref())
            .and_then(|m| m.get(POLICY_METADATA_FIELD))
            .and_then(Value::as_str)
    }
}

fn normalize_indices(indices: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = indices.into_iter().collect();
    out.sort();
    out.dedup();
    out
}
