use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use snapq_core::model::{CatalogSummary, CatalogView, SnapshotDetails};
use snapq_core::{SnapshotDescriptor, SnapshotIdentity, SnapshotRef, SnapshotState};

/// Owned token list from string literals
#[allow(dead_code)]
pub fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Identity with a uuid derived from the name
#[allow(dead_code)]
pub fn id(name: &str) -> SnapshotIdentity {
    SnapshotIdentity::new(name, format!("{}-uuid", name))
}

#[allow(dead_code)]
pub fn snapshot_ref(repo: &str, name: &str) -> SnapshotRef {
    SnapshotRef::new(repo, id(name))
}

/// User metadata carrying a policy name
#[allow(dead_code)]
pub fn policy_metadata(policy: &str) -> Map<String, Value> {
    json!({ "policy": policy })
        .as_object()
        .cloned()
        .unwrap_or_default()
}

/// A completed snapshot with the given timings and shard counts
#[allow(dead_code)]
pub fn descriptor(
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
            user_metadata: policy.map(policy_metadata),
        },
    )
}

/// Catalog view consistent with the given descriptors
#[allow(dead_code)]
pub fn catalog_for(descriptors: &[SnapshotDescriptor]) -> CatalogView {
    let mut summaries = BTreeMap::new();
    let mut associations: BTreeMap<String, Vec<SnapshotIdentity>> = BTreeMap::new();
    for d in descriptors {
        summaries.insert(
            d.identity.clone(),
            CatalogSummary {
                start_time: d.start_time(),
                end_time: d.end_time(),
                policy: Some(d.policy().unwrap_or_default().to_string()),
                state: d.state,
            },
        );
        for index in &d.indices {
            associations
                .entry(index.clone())
                .or_default()
                .push(d.identity.clone());
        }
    }
    CatalogView::new(summaries, associations)
}
