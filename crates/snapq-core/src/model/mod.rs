//! Request-scoped projections of repository and cluster state.
//!
//! Nothing in this module is ever mutated after construction; every value is
//! built fresh for one listing request and dropped with its response.

pub mod catalog;
pub mod descriptor;
pub mod identity;
pub mod in_flight;
pub mod repository;

pub use catalog::{CatalogSummary, CatalogView};
pub use descriptor::{SnapshotDescriptor, SnapshotDetails, SnapshotState, POLICY_METADATA_FIELD};
pub use identity::{SnapshotIdentity, SnapshotRef};
pub use in_flight::InFlightEntry;
pub use repository::RepositoryMetadata;
