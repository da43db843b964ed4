//! Fixture parser with validation
//!
//! Parses YAML and validates schema version, name uniqueness and that every
//! in-flight snapshot targets a registered repository.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use snapq_core::model::{CatalogSummary, SnapshotDetails};
use snapq_core::{InFlightEntry, SnapshotDescriptor, SnapshotIdentity};

use crate::errors::{fixture_validation, io_error, Result};
use crate::fixture::format_v0::{FixtureInFlight, FixtureRepository, FixtureSnapshot, FixtureV0};
use crate::memory::{InMemoryCluster, InMemoryRepository};

/// Parse a fixture file from a path
pub fn parse_fixture_file(path: &Path) -> Result<FixtureV0> {
    let content = fs::read_to_string(path).map_err(|e| io_error("fixture_read", e))?;
    parse_fixture_str(&content)
}

/// Parse a fixture from a string
pub fn parse_fixture_str(content: &str) -> Result<FixtureV0> {
    let fixture: FixtureV0 = serde_yaml::from_str(content)
        .map_err(|e| fixture_validation(&format!("YAML parse error: {}", e)))?;

    validate_fixture(&fixture)?;

    Ok(fixture)
}

/// Parse a fixture file and build the cluster it describes
pub fn load_cluster_file(path: &Path) -> Result<InMemoryCluster> {
    Ok(build_cluster(parse_fixture_file(path)?))
}

/// Parse a fixture string and build the cluster it describes
pub fn load_cluster_str(content: &str) -> Result<InMemoryCluster> {
    Ok(build_cluster(parse_fixture_str(content)?))
}

fn validate_fixture(fixture: &FixtureV0) -> Result<()> {
    if fixture.schema_version != 0 {
        return Err(fixture_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            fixture.schema_version
        )));
    }

    let mut repositories = HashSet::new();
    for repo in &fixture.repositories {
        if repo.name.is_empty() || repo.name.contains(',') {
            return Err(fixture_validation(&format!(
                "Invalid repository name: '{}'",
                repo.name
            )));
        }
        if !repositories.insert(repo.name.as_str()) {
            return Err(fixture_validation(&format!(
                "Duplicate repository {}",
                repo.name
            )));
        }
        let mut names = HashSet::new();
        for snap in &repo.snapshots {
            validate_snapshot_name(&snap.name)?;
            if !names.insert(snap.name.as_str()) {
                return Err(fixture_validation(&format!(
                    "Duplicate snapshot {} in repository {}",
                    snap.name, repo.name
                )));
            }
        }
    }

    for entry in &fixture.in_flight {
        validate_snapshot_name(&entry.name)?;
        if !repositories.contains(entry.repository.as_str()) {
            return Err(fixture_validation(&format!(
                "In-flight snapshot {} references unknown repository {}",
                entry.name, entry.repository
            )));
        }
    }

    Ok(())
}

fn validate_snapshot_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(',') {
        return Err(fixture_validation(&format!(
            "Invalid snapshot name: '{}'",
            name
        )));
    }
    Ok(())
}

fn identity(name: &str, uuid: Option<&str>) -> SnapshotIdentity {
    match uuid {
        Some(uuid) => SnapshotIdentity::new(name, uuid),
        None => SnapshotIdentity::generate(name),
    }
}

fn build_cluster(fixture: FixtureV0) -> InMemoryCluster {
    let mut cluster = InMemoryCluster::new();
    for repo in fixture.repositories {
        let kind = repo.kind.clone();
        cluster = cluster.with_typed_repository(&kind, build_repository(repo));
    }
    for entry in fixture.in_flight {
        cluster = cluster.with_in_flight(build_in_flight(entry));
    }
    cluster
}

fn build_repository(repo: FixtureRepository) -> InMemoryRepository {
    let mut out = InMemoryRepository::new(repo.name.clone());
    if let Some(reason) = repo.unavailable {
        out = out.unavailable(reason);
    }
    for snap in repo.snapshots {
        let legacy = snap.legacy_catalog;
        let unloadable = snap.unloadable;
        let state = snap.state;
        let descriptor = build_descriptor(&repo.name, snap);
        out = if unloadable {
            out.with_unloadable_snapshot(descriptor)
        } else if legacy {
            let summary = CatalogSummary {
                state: Some(state),
                ..CatalogSummary::unknown()
            };
            out.with_snapshot_and_summary(descriptor, summary)
        } else {
            out.with_snapshot(descriptor)
        };
    }
    out
}

fn build_descriptor(repository: &str, snap: FixtureSnapshot) -> SnapshotDescriptor {
    SnapshotDescriptor::full(
        repository,
        identity(&snap.name, snap.uuid.as_deref()),
        snap.indices,
        snap.state,
        SnapshotDetails {
            start_time: snap.start_time,
            end_time: snap.end_time,
            total_shards: snap.total_shards,
            failed_shards: snap.failed_shards,
            user_metadata: snap.metadata,
        },
    )
}

fn build_in_flight(entry: FixtureInFlight) -> InFlightEntry {
    InFlightEntry {
        identity: identity(&entry.name, entry.uuid.as_deref()),
        repository: entry.repository,
        indices: entry.indices,
        start_time: entry.start_time,
        total_shards: entry.total_shards,
        failed_shards: entry.failed_shards,
        user_metadata: entry.metadata,
    }
}
