use snapq_core::errors::{ExError, ExErrorKind, SnapqError};

#[test]
fn test_snapshot_missing_names_repository_and_snapshot() {
    let ex_err: ExError = SnapqError::SnapshotMissing {
        repository: "repo".to_string(),
        snapshot: "snap-x".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::SnapshotMissing);
    assert_eq!(ex_err.code(), "ERR_SNAPSHOT_MISSING");
    assert_eq!(ex_err.repository(), Some("repo"));
    assert_eq!(ex_err.snapshot(), Some("snap-x"));
    assert!(ex_err.message().contains("[repo:snap-x] is missing"));
}

#[test]
fn test_cursor_errors_are_invalid_input() {
    let ex_err: ExError = SnapqError::InvalidCursor {
        reason: "bad".to_string(),
    }
    .into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::InvalidInput, "ERR_INVALID_INPUT"),
        (ExErrorKind::SnapshotMissing, "ERR_SNAPSHOT_MISSING"),
        (ExErrorKind::RepositoryMissing, "ERR_REPOSITORY_MISSING"),
        (ExErrorKind::RepositoryUnavailable, "ERR_REPOSITORY_UNAVAILABLE"),
        (ExErrorKind::SnapshotLoadFailed, "ERR_SNAPSHOT_LOAD_FAILED"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Cancelled, "ERR_CANCELLED"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_repository_scope_split() {
    assert!(ExErrorKind::RepositoryUnavailable.is_repository_scoped());
    assert!(ExErrorKind::SnapshotMissing.is_repository_scoped());
    assert!(!ExErrorKind::InvalidInput.is_repository_scoped());
    assert!(!ExErrorKind::Cancelled.is_repository_scoped());
    assert!(!ExErrorKind::Internal.is_repository_scoped());
}

#[test]
fn test_failure_serializes_with_code() {
    let ex_err: ExError = SnapqError::RepositoryUnavailable {
        repository: "r1".to_string(),
        reason: "catalog unreadable".to_string(),
    }
    .into();
    let json = serde_json::to_value(&ex_err).unwrap_or_default();
    assert_eq!(json["code"], "ERR_REPOSITORY_UNAVAILABLE");
    assert_eq!(json["repository"], "r1");
    assert!(json["message"]
        .as_str()
        .unwrap_or_default()
        .contains("catalog unreadable"));
}

#[test]
fn test_source_chain_is_exposed() {
    use std::error::Error as _;

    let cause: ExError = SnapqError::Internal {
        message: "boom".to_string(),
    }
    .into();
    let err = ExError::new(ExErrorKind::Io)
        .with_op("load")
        .with_source(cause);
    assert!(err.source().is_some());
    assert!(err.to_string().contains("caused by"));
}
