//! The listing request, its filters and the sort/page engine.

pub mod cursor;
pub mod predicates;
pub mod repositories;
pub mod request;
pub mod resolver;
pub mod response;
pub mod sort;

pub use cursor::{After, Cursor, SortKey, SortOrder, SortValue};
pub use predicates::{CatalogField, FullPredicate, PolicyFilter, PreflightPredicate, SnapshotPredicates};
pub use repositories::{filter_by_from_sort_value, resolve_repositories, ResolvedRepositories};
pub use request::{GetSnapshotsRequest, PageSize};
pub use resolver::KnownSnapshots;
pub use response::GetSnapshotsResponse;
pub use sort::{compare, sort_snapshots, PageRequest, SnapshotsInRepo};
