//! snapq store - repository catalogs, snapshot loading and cluster state
//!
//! Provides:
//! - The async [`SnapshotRepository`] seam and the [`ClusterState`] view
//! - In-memory implementations with failure injection
//! - A YAML cluster fixture format for the CLI and tests

pub mod catalog;
pub mod errors;
pub mod fixture;
pub mod memory;

pub use catalog::{ClusterState, SnapshotRepository};
pub use errors::Result;
pub use memory::{InMemoryCluster, InMemoryRepository};
