use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use snapq_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// test assertions and the per-repository failures map of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Request validation
    InvalidInput,

    // Resolution
    SnapshotMissing,
    RepositoryMissing,

    // Repository I/O
    RepositoryUnavailable,
    SnapshotLoadFailed,
    Serialization,
    Io,

    // Whole-request
    Cancelled,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::SnapshotMissing => "ERR_SNAPSHOT_MISSING",
            ExErrorKind::RepositoryMissing => "ERR_REPOSITORY_MISSING",
            ExErrorKind::RepositoryUnavailable => "ERR_REPOSITORY_UNAVAILABLE",
            ExErrorKind::SnapshotLoadFailed => "ERR_SNAPSHOT_LOAD_FAILED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind can be attributed to one repository.
    ///
    /// Repository-scoped errors are collected into the failures map of a
    /// multi-repository response; every other kind aborts the whole request.
    pub fn is_repository_scoped(&self) -> bool {
        matches!(
            self,
            ExErrorKind::SnapshotMissing
                | ExErrorKind::RepositoryMissing
                | ExErrorKind::RepositoryUnavailable
                | ExErrorKind::SnapshotLoadFailed
                | ExErrorKind::Serialization
                | ExErrorKind::Io
        )
    }
}

/// Canonical structured error type
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    repository: Option<String>,
    snapshot: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            repository: None,
            snapshot: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
        self.snapshot = Some(snapshot.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn snapshot(&self) -> Option<&str> {
        self.snapshot.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    pub fn is_repository_scoped(&self) -> bool {
        self.kind.is_repository_scoped()
    }

    /// Shorthand for the cancellation error raised at every checkpoint
    pub fn cancelled(op: &str) -> Self {
        SnapqError::Cancelled.into_ex().with_op(op)
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(repository) = &self.repository {
            write!(f, " (repository: {})", repository)?;
        }
        if let Some(snapshot) = &self.snapshot {
            write!(f, " (snapshot: {})", snapshot)?;
        }
        if let Some(source) = &self.source {
            write!(f, "; caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Failures-map entries are rendered as `{code, message, repository?, snapshot?}`
impl Serialize for ExError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ExError", 4)?;
        state.serialize_field("code", self.code())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("repository", &self.repository)?;
        state.serialize_field("snapshot", &self.snapshot)?;
        state.end()
    }
}

// ========== Domain Errors ==========

/// Domain errors raised while listing snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapqError {
    #[error("[{repository}:{snapshot}] is missing")]
    SnapshotMissing {
        repository: String,
        snapshot: String,
    },

    #[error("[{repository}] missing")]
    RepositoryMissing { repository: String },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Invalid cursor: {reason}")]
    InvalidCursor { reason: String },

    #[error("Repository [{repository}] unavailable: {reason}")]
    RepositoryUnavailable { repository: String, reason: String },

    #[error("Failed to load snapshot [{repository}:{snapshot}]: {reason}")]
    SnapshotLoadFailed {
        repository: String,
        snapshot: String,
        reason: String,
    },

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SnapqError {
    /// Convert into the canonical structured error
    pub fn into_ex(self) -> ExError {
        self.into()
    }
}

impl From<SnapqError> for ExError {
    fn from(err: SnapqError) -> Self {
        let message = err.to_string();
        match err {
            SnapqError::SnapshotMissing {
                repository,
                snapshot,
            } => ExError::new(ExErrorKind::SnapshotMissing)
                .with_repository(repository)
                .with_snapshot(snapshot)
                .with_message(message),

            SnapqError::RepositoryMissing { repository } => {
                ExError::new(ExErrorKind::RepositoryMissing)
                    .with_repository(repository)
                    .with_message(message)
            }

            SnapqError::InvalidRequest { .. } | SnapqError::InvalidCursor { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            SnapqError::RepositoryUnavailable { repository, .. } => {
                ExError::new(ExErrorKind::RepositoryUnavailable)
                    .with_repository(repository)
                    .with_message(message)
            }

            SnapqError::SnapshotLoadFailed {
                repository,
                snapshot,
                ..
            } => ExError::new(ExErrorKind::SnapshotLoadFailed)
                .with_repository(repository)
                .with_snapshot(snapshot)
                .with_message(message),

            SnapqError::Cancelled => ExError::new(ExErrorKind::Cancelled).with_message(message),

            SnapqError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            SnapqError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}

impl From<serde_json::Error> for SnapqError {
    fn from(err: serde_json::Error) -> Self {
        SnapqError::Serialization {
            message: err.to_string(),
        }
    }
}
