//! In-memory repositories and cluster state.
//!
//! Used by the CLI fixture loader and by tests. Failures can be injected per
//! repository (unreadable catalog) and per snapshot (unloadable details).

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use snapq_core::model::{CatalogSummary, RepositoryMetadata};
use snapq_core::{CatalogView, ExError, InFlightEntry, SnapshotDescriptor, SnapshotIdentity};
use tokio_util::sync::CancellationToken;

use crate::catalog::{ClusterState, SnapshotRepository};
use crate::errors::{load_failed, repository_unavailable, Result};

#[derive(Debug, Clone)]
struct StoredSnapshot {
    descriptor: SnapshotDescriptor,
    summary: CatalogSummary,
    loadable: bool,
}

/// Repository held entirely in memory
#[derive(Debug)]
pub struct InMemoryRepository {
    name: String,
    snapshots: BTreeMap<SnapshotIdentity, StoredSnapshot>,
    unavailable: Option<String>,
    catalog_delay: Option<Duration>,
    load_delay: Option<Duration>,
    loads: AtomicUsize,
}

impl InMemoryRepository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snapshots: BTreeMap::new(),
            unavailable: None,
            catalog_delay: None,
            load_delay: None,
            loads: AtomicUsize::new(0),
        }
    }

    /// Add a completed snapshot; the catalog summary is derived from it
    pub fn with_snapshot(mut self, descriptor: SnapshotDescriptor) -> Self {
        let summary = summarize(&descriptor);
        self.insert(descriptor, summary, true);
        self
    }

    /// Add a snapshot with an explicit catalog summary, e.g. one written
    /// before start times or policies were recorded
    pub fn with_snapshot_and_summary(
        mut self,
        descriptor: SnapshotDescriptor,
        summary: CatalogSummary,
    ) -> Self {
        self.insert(descriptor, summary, true);
        self
    }

    /// Add a snapshot that is listed in the catalog but fails to load
    pub fn with_unloadable_snapshot(mut self, descriptor: SnapshotDescriptor) -> Self {
        let summary = summarize(&descriptor);
        self.insert(descriptor, summary, false);
        self
    }

    /// Make every catalog read and load fail
    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.unavailable = Some(reason.into());
        self
    }

    /// Sleep before answering a catalog read
    pub fn with_catalog_delay(mut self, delay: Duration) -> Self {
        self.catalog_delay = Some(delay);
        self
    }

    /// Sleep before each snapshot load
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    /// Number of snapshot loads attempted so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn insert(&mut self, descriptor: SnapshotDescriptor, summary: CatalogSummary, loadable: bool) {
        self.snapshots.insert(
            descriptor.identity.clone(),
            StoredSnapshot {
                descriptor,
                summary,
                loadable,
            },
        );
    }

    fn check_available(&self) -> Result<()> {
        match &self.unavailable {
            Some(reason) => Err(repository_unavailable(&self.name, reason)),
            None => Ok(()),
        }
    }

    fn load_one(&self, id: &SnapshotIdentity) -> Result<SnapshotDescriptor> {
        self.check_available()?;
        match self.snapshots.get(id) {
            Some(stored) if stored.loadable => Ok(stored.descriptor.clone()),
            Some(_) => Err(load_failed(&self.name, &id.name, "snapshot metadata is corrupt")),
            None => Err(load_failed(&self.name, &id.name, "snapshot not found")),
        }
    }
}

/// Catalog summary as a repository would record it on completion
fn summarize(d: &SnapshotDescriptor) -> CatalogSummary {
    CatalogSummary {
        start_time: d.start_time(),
        end_time: d.end_time(),
        policy: Some(d.policy().unwrap_or_default().to_string()),
        state: d.state,
    }
}

#[async_trait]
impl SnapshotRepository for InMemoryRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn catalog(&self) -> Result<CatalogView> {
        if let Some(delay) = self.catalog_delay {
            tokio::time::sleep(delay).await;
        }
        self.check_available()?;
        let mut summaries = BTreeMap::new();
        let mut associations: BTreeMap<String, Vec<SnapshotIdentity>> = BTreeMap::new();
        for (id, stored) in &self.snapshots {
            summaries.insert(id.clone(), stored.summary.clone());
            for index in &stored.descriptor.indices {
                associations
                    .entry(index.clone())
                    .or_default()
                    .push(id.clone());
            }
        }
        Ok(CatalogView::new(summaries, associations))
    }

    async fn load_snapshots(
        &self,
        ids: Vec<SnapshotIdentity>,
        ignore_failures: bool,
        cancel: &CancellationToken,
        on_each: &mut (dyn FnMut(SnapshotDescriptor) + Send),
    ) -> Result<()> {
        for id in ids {
            if cancel.is_cancelled() {
                return Err(ExError::cancelled("load_snapshots").with_repository(self.name.clone()));
            }
            if let Some(delay) = self.load_delay {
                tokio::time::sleep(delay).await;
            }
            self.loads.fetch_add(1, Ordering::SeqCst);
            match self.load_one(&id) {
                Ok(descriptor) => on_each(descriptor),
                Err(e) if ignore_failures => {
                    tracing::warn!(
                        repository = %self.name,
                        snapshot = %id,
                        err_code = e.code(),
                        "failed to load snapshot, skipping"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Cluster state assembled from in-memory repositories
#[derive(Debug, Default)]
pub struct InMemoryCluster {
    repositories: Vec<RepositoryMetadata>,
    handles: HashMap<String, Arc<InMemoryRepository>>,
    in_flight: Vec<InFlightEntry>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository of type `fs`
    pub fn with_repository(self, repository: InMemoryRepository) -> Self {
        self.with_typed_repository("fs", repository)
    }

    pub fn with_typed_repository(mut self, kind: &str, repository: InMemoryRepository) -> Self {
        let name = repository.name.clone();
        if !self.handles.contains_key(&name) {
            self.repositories.push(RepositoryMetadata::new(name.clone(), kind));
        }
        self.handles.insert(name, Arc::new(repository));
        self
    }

    /// Record a snapshot currently being written
    pub fn with_in_flight(mut self, entry: InFlightEntry) -> Self {
        self.in_flight.push(entry);
        self
    }

    /// Concrete handle, for inspecting load counts in tests
    pub fn handle(&self, name: &str) -> Option<Arc<InMemoryRepository>> {
        self.handles.get(name).cloned()
    }
}

impl ClusterState for InMemoryCluster {
    fn repositories(&self) -> Vec<RepositoryMetadata> {
        self.repositories.clone()
    }

    fn repository(&self, name: &str) -> Option<Arc<dyn SnapshotRepository>> {
        self.handles
            .get(name)
            .map(|r| Arc::clone(r) as Arc<dyn SnapshotRepository>)
    }

    fn in_flight(&self, repository: &str) -> Vec<InFlightEntry> {
        self.in_flight
            .iter()
            .filter(|e| e.repository == repository)
            .cloned()
            .collect()
    }
}
