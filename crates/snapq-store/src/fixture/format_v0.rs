//! Fixture Format v0 schema
//!
//! Describes repositories, their snapshots and the snapshots currently being
//! written, as YAML.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snapq_core::SnapshotState;

/// Top-level fixture file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Registered repositories, in registration order
    #[serde(default)]
    pub repositories: Vec<FixtureRepository>,

    /// Snapshots currently being written
    #[serde(default)]
    pub in_flight: Vec<FixtureInFlight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRepository {
    pub name: String,

    /// Storage type
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// When set, every read of this repository fails with this reason
    #[serde(default)]
    pub unavailable: Option<String>,

    #[serde(default)]
    pub snapshots: Vec<FixtureSnapshot>,
}

fn default_kind() -> String {
    "fs".to_string()
}

/// A completed snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSnapshot {
    pub name: String,

    /// Generated when omitted
    #[serde(default)]
    pub uuid: Option<String>,

    #[serde(default = "default_state")]
    pub state: SnapshotState,

    /// Epoch millis
    pub start_time: i64,

    /// Epoch millis
    pub end_time: i64,

    #[serde(default)]
    pub indices: Vec<String>,

    #[serde(default)]
    pub total_shards: u32,

    #[serde(default)]
    pub failed_shards: u32,

    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,

    /// Drop start/end time and policy from the catalog summary, as for
    /// snapshots written by older versions
    #[serde(default)]
    pub legacy_catalog: bool,

    /// Listed in the catalog but fails to load
    #[serde(default)]
    pub unloadable: bool,
}

fn default_state() -> SnapshotState {
    SnapshotState::Success
}

/// A snapshot still being written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureInFlight {
    pub repository: String,
    pub name: String,
    #[serde(default)]
    pub uuid: Option<String>,
    pub start_time: i64,
    #[serde(default)]
    pub indices: Vec<String>,
    #[serde(default)]
    pub total_shards: u32,
    #[serde(default)]
    pub failed_shards: u32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}
