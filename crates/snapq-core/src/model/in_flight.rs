use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::descriptor::{SnapshotDescriptor, SnapshotDetails, SnapshotState};
use super::identity::{SnapshotIdentity, SnapshotRef};

/// A snapshot still being written, as reported by cluster coordination state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InFlightEntry {
    pub repository: String,
    #[serde(flatten)]
    pub identity: SnapshotIdentity,
    #[serde(default)]
    pub indices: Vec<String>,
    pub start_time: i64,
    #[serde(default)]
    pub total_shards: u32,
    #[serde(default)]
    pub failed_shards: u32,
    #[serde(default)]
    pub user_metadata: Option<Map<String, Value>>,
}

impl InFlightEntry {
    pub fn snapshot_ref(&self) -> SnapshotRef {
        SnapshotRef::new(self.repository.clone(), self.identity.clone())
    }

    /// Full descriptor; end time stays 0 until the snapshot completes
    pub fn to_descriptor(&self) -> SnapshotDescriptor {
        SnapshotDescriptor::full(
            self.repository.clone(),
            self.identity.clone(),
            self.indices.iter().cloned(),
            SnapshotState::InProgress,
            SnapshotDetails {
                start_time: self.start_time,
                end_time: 0,
                total_shards: self.total_shards,
                failed_shards: self.failed_shards,
                user_metadata: self.user_metadata.clone(),
            },
        )
    }

    pub fn to_basic_descriptor(&self) -> SnapshotDescriptor {
        SnapshotDescriptor::basic(
            self.repository.clone(),
            self.identity.clone(),
            self.indices.iter().cloned(),
            Some(SnapshotState::InProgress),
        )
    }
}
