//! Error helpers for snapq-store
//!
//! Wraps snapq-core ExError with store-specific constructors

use snapq_core::errors::{ExError, ExErrorKind, SnapqError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Repository catalog could not be read
pub fn repository_unavailable(repository: &str, reason: &str) -> ExError {
    SnapqError::RepositoryUnavailable {
        repository: repository.to_string(),
        reason: reason.to_string(),
    }
    .into_ex()
    .with_op("read_catalog")
}

/// One snapshot's details could not be loaded
pub fn load_failed(repository: &str, snapshot: &str, reason: &str) -> ExError {
    SnapqError::SnapshotLoadFailed {
        repository: repository.to_string(),
        snapshot: snapshot.to_string(),
        reason: reason.to_string(),
    }
    .into_ex()
    .with_op("load_snapshot")
}

/// Fixture file rejected
pub fn fixture_validation(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("fixture_parse")
        .with_message(reason.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
