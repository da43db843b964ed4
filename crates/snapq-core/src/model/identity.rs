use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name + uuid of one snapshot. Unique within a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotIdentity {
    pub name: String,
    pub uuid: String,
}

impl SnapshotIdentity {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }

    /// Identity with a freshly generated uuid (fixtures and tests)
    pub fn generate(name: impl Into<String>) -> Self {
        Self::new(name, Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for SnapshotIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.uuid)
    }
}

/// A snapshot addressed across the whole cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub repository: String,
    pub identity: SnapshotIdentity,
}

impl SnapshotRef {
    pub fn new(repository: impl Into<String>, identity: SnapshotIdentity) -> Self {
        Self {
            repository: repository.into(),
            identity,
        }
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }
}

impl std::fmt::Display for SnapshotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.repository, self.identity)
    }
}
