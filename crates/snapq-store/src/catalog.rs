//! Seams between the query engine and repository storage.

use std::sync::Arc;

use async_trait::async_trait;
use snapq_core::model::RepositoryMetadata;
use snapq_core::{CatalogView, InFlightEntry, SnapshotDescriptor, SnapshotIdentity};
use tokio_util::sync::CancellationToken;

use crate::errors::Result;

/// Read access to one repository
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the catalog: per-snapshot summaries and index associations.
    ///
    /// # Errors
    ///
    /// `RepositoryUnavailable` if the catalog cannot be read.
    async fn catalog(&self) -> Result<CatalogView>;

    /// Load full descriptors for `ids`, handing each one to `on_each` as it
    /// completes.
    ///
    /// With `ignore_failures` a snapshot that fails to load is logged and
    /// skipped; otherwise the first failure is returned. The token is checked
    /// before every load.
    ///
    /// # Errors
    ///
    /// `SnapshotLoadFailed`, `RepositoryUnavailable`, or `Cancelled`.
    async fn load_snapshots(
        &self,
        ids: Vec<SnapshotIdentity>,
        ignore_failures: bool,
        cancel: &CancellationToken,
        on_each: &mut (dyn FnMut(SnapshotDescriptor) + Send),
    ) -> Result<()>;
}

/// Cluster-level view: registered repositories and running snapshots
pub trait ClusterState: Send + Sync {
    /// Registered repositories in registration order
    fn repositories(&self) -> Vec<RepositoryMetadata>;

    /// Storage handle for a registered repository
    fn repository(&self, name: &str) -> Option<Arc<dyn SnapshotRepository>>;

    /// Snapshots currently being written to `repository`
    fn in_flight(&self, repository: &str) -> Vec<InFlightEntry>;
}
