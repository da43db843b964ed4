//! Cluster fixture files
//!
//! Provides:
//! - Fixture Format v0 schema
//! - YAML parser with validation
//! - Conversion into an [`InMemoryCluster`](crate::memory::InMemoryCluster)

pub mod format_v0;
pub mod parser;

pub use format_v0::FixtureV0;
pub use parser::{load_cluster_file, load_cluster_str, parse_fixture_file, parse_fixture_str};
