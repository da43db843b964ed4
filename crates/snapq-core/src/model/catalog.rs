use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::descriptor::SnapshotState;
use super::identity::SnapshotIdentity;

/// Marker for an unknown time in catalog summaries
pub const UNKNOWN_TIME: i64 = -1;

/// Cheap per-snapshot summary kept in a repository's catalog index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSummary {
    /// Epoch millis, `-1` if unknown
    pub start_time: i64,
    /// Epoch millis, `-1` if unknown or still running
    pub end_time: i64,
    /// `None`: not recorded. `Some("")`: created without a policy.
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub state: Option<SnapshotState>,
}

impl CatalogSummary {
    /// Summary for a catalog entry written before details were recorded
    pub fn unknown() -> Self {
        Self {
            start_time: UNKNOWN_TIME,
            end_time: UNKNOWN_TIME,
            policy: None,
            state: None,
        }
    }

    /// `-1` unless both ends are known
    pub fn duration(&self) -> i64 {
        if self.start_time == UNKNOWN_TIME || self.end_time == UNKNOWN_TIME {
            UNKNOWN_TIME
        } else {
            self.end_time - self.start_time
        }
    }
}

/// One repository's catalog as fetched for a single request.
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    summaries: BTreeMap<SnapshotIdentity, CatalogSummary>,
    index_associations: BTreeMap<String, Vec<SnapshotIdentity>>,
}

impl CatalogView {
    pub fn new(
        summaries: BTreeMap<SnapshotIdentity, CatalogSummary>,
        index_associations: BTreeMap<String, Vec<SnapshotIdentity>>,
    ) -> Self {
        Self {
            summaries,
            index_associations,
        }
    }

    pub fn identities(&self) -> impl Iterator<Item = &SnapshotIdentity> {
        self.summaries.keys()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn summary(&self, id: &SnapshotIdentity) -> Option<&CatalogSummary> {
        self.summaries.get(id)
    }

    pub fn start_time(&self, id: &SnapshotIdentity) -> i64 {
        self.summary(id).map_or(UNKNOWN_TIME, |s| s.start_time)
    }

    pub fn duration(&self, id: &SnapshotIdentity) -> i64 {
        self.summary(id).map_or(UNKNOWN_TIME, CatalogSummary::duration)
    }

    /// Recorded policy: `None` if not recorded, `Some(None)` if recorded as
    /// "no policy", `Some(Some(name))` otherwise.
    pub fn policy(&self, id: &SnapshotIdentity) -> Option<Option<&str>> {
        let recorded = self.summary(id)?.policy.as_deref()?;
        Some(if recorded.is_empty() {
            None
        } else {
            Some(recorded)
        })
    }

    pub fn state(&self, id: &SnapshotIdentity) -> Option<SnapshotState> {
        self.summary(id).and_then(|s| s.state)
    }

    /// Number of indices the catalog associates with this snapshot
    pub fn index_count(&self, id: &SnapshotIdentity) -> i64 {
        self.index_associations
            .values()
            .filter(|snapshots| snapshots.contains(id))
            .count() as i64
    }

    /// Index names per snapshot for the given targets, from one scan of the
    /// index associations
    pub fn indices_for(
        &self,
        targets: &HashSet<&SnapshotIdentity>,
    ) -> HashMap<SnapshotIdentity, Vec<String>> {
        let mut out: HashMap<SnapshotIdentity, Vec<String>> = HashMap::new();
        for (index, snapshots) in &self.index_associations {
            for id in snapshots {
                if targets.contains(id) {
                    out.entry(id.clone()).or_default().push(index.clone());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> SnapshotIdentity {
        SnapshotIdentity::new(name, format!("{}-uuid", name))
    }

    fn view() -> CatalogView {
        let mut summaries = BTreeMap::new();
        summaries.insert(
            id("a"),
            CatalogSummary {
                start_time: 100,
                end_time: 150,
                policy: Some(String::new()),
                state: Some(SnapshotState::Success),
            },
        );
        summaries.insert(id("b"), CatalogSummary::unknown());
        let mut assoc = BTreeMap::new();
        assoc.insert("idx-1".to_string(), vec![id("a"), id("b")]);
        assoc.insert("idx-2".to_string(), vec![id("a")]);
        CatalogView::new(summaries, assoc)
    }

    #[test]
    fn test_duration_unknown_when_either_end_unknown() {
        let v = view();
        assert_eq!(v.duration(&id("a")), 50);
        assert_eq!(v.duration(&id("b")), UNKNOWN_TIME);
        assert_eq!(v.duration(&id("missing")), UNKNOWN_TIME);
    }

    #[test]
    fn test_policy_distinguishes_unrecorded_from_none() {
        let v = view();
        assert_eq!(v.policy(&id("a")), Some(None));
        assert_eq!(v.policy(&id("b")), None);
    }

    #[test]
    fn test_index_count_and_indices_for() {
        let v = view();
        assert_eq!(v.index_count(&id("a")), 2);
        assert_eq!(v.index_count(&id("b")), 1);

        let a = id("a");
        let targets: HashSet<&SnapshotIdentity> = [&a].into_iter().collect();
        let by_snapshot = v.indices_for(&targets);
        assert_eq!(by_snapshot.len(), 1);
        assert_eq!(by_snapshot[&a], vec!["idx-1", "idx-2"]);
    }
}
