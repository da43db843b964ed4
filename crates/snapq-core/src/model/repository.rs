use serde::{Deserialize, Serialize};

/// A registered snapshot repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    pub name: String,
    /// Storage type, e.g. `fs` or `s3`
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "fs".to_string()
}

impl RepositoryMetadata {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}
