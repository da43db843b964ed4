//! snapq core - request-scoped snapshot listing kernel
//!
//! This crate holds everything about a snapshot listing that does not touch
//! a repository or the cluster:
//! - Snapshot identity, catalog summary and descriptor models
//! - Glob pattern sets with `*`-only wildcards
//! - Name resolution against a repository's known snapshots
//! - The two-tier predicate pipeline (catalog preflight vs. full descriptor)
//! - The sort/cursor/pagination engine
//! - Request validation and the response contract
//!
//! Everything here is synchronous; the async fan-out lives in `snapq-engine`.

pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod pattern;
pub mod queries;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, Result, SnapqError};
pub use model::{
    CatalogSummary, CatalogView, InFlightEntry, RepositoryMetadata, SnapshotDescriptor,
    SnapshotIdentity, SnapshotRef, SnapshotState,
};
pub use queries::{
    Cursor, GetSnapshotsRequest, GetSnapshotsResponse, PageSize, SnapshotPredicates,
    SnapshotsInRepo, SortKey, SortOrder,
};
