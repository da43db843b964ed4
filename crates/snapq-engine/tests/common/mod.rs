use serde_json::json;
use snapq_core::model::SnapshotDetails;
use snapq_core::{InFlightEntry, SnapshotDescriptor, SnapshotIdentity, SnapshotState};
use snapq_store::{InMemoryCluster, InMemoryRepository};

#[allow(dead_code)]
pub fn id(name: &str) -> SnapshotIdentity {
    SnapshotIdentity::new(name, format!("{}-uuid", name))
}

/// A completed snapshot with `total_shards` equal to its index count
#[allow(dead_code)]
pub fn snap(
    repo: &str,
    name: &str,
    start_time: i64,
    end_time: i64,
    indices: &[&str],
    policy: Option<&str>,
) -> SnapshotDescriptor {
    SnapshotDescriptor::full(
        repo,
        id(name),
        indices.iter().map(|s| s.to_string()),
        SnapshotState::Success,
        SnapshotDetails {
            start_time,
            end_time,
            total_shards: indices.len() as u32,
            failed_shards: 0,
            user_metadata: policy.and_then(|p| json!({ "policy": p }).as_object().cloned()),
        },
    )
}

#[allow(dead_code)]
pub fn in_flight(repo: &str, name: &str, start_time: i64, indices: &[&str]) -> InFlightEntry {
    InFlightEntry {
        repository: repo.to_string(),
        identity: id(name),
        indices: indices.iter().map(|s| s.to_string()).collect(),
        start_time,
        total_shards: indices.len() as u32,
        failed_shards: 0,
        user_metadata: None,
    }
}

/// Two healthy repositories, five snapshots.
///
/// By start time: a1(100) b1(200) a2(300) b2(400) a3(500)
#[allow(dead_code)]
pub fn two_repo_cluster() -> InMemoryCluster {
    InMemoryCluster::new()
        .with_repository(
            InMemoryRepository::new("repo-a")
                .with_snapshot(snap("repo-a", "a1", 100, 150, &["i1"], Some("daily")))
                .with_snapshot(snap("repo-a", "a2", 300, 400, &["i1", "i2"], Some("weekly")))
                .with_snapshot(snap("repo-a", "a3", 500, 520, &["i3"], None)),
        )
        .with_repository(
            InMemoryRepository::new("repo-b")
                .with_snapshot(snap("repo-b", "b1", 200, 260, &["i1"], None))
                .with_snapshot(snap("repo-b", "b2", 400, 410, &["i2"], Some("daily"))),
        )
}

#[allow(dead_code)]
pub fn names(snapshots: &[SnapshotDescriptor]) -> Vec<&str> {
    snapshots.iter().map(|d| d.name()).collect()
}
