//! Domain errors

use thiserror::Error;

/// How a failed query should be treated by the resolution services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// The projection references a column this deployment does not have.
    UnknownColumn,
    /// No row matched.
    NotFound,
    /// Rejected by a row-level authorization policy.
    PermissionDenied,
    Other,
}

/// Failure reported by the query layer. Displays as the raw message, which is
/// what the role-error screen shows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify an error from its message text alone.
    ///
    /// Any message mentioning "column" counts as an unknown column, so an
    /// unrelated error that happens to mention a column also triggers the
    /// projection fallback. Adapters that see structured error codes should
    /// build the kind directly instead.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        let kind = if lower.contains("column") {
            QueryErrorKind::UnknownColumn
        } else if lower.contains("no rows") || lower.contains("not found") {
            QueryErrorKind::NotFound
        } else if lower.contains("permission denied") || lower.contains("row-level security") {
            QueryErrorKind::PermissionDenied
        } else {
            QueryErrorKind::Other
        };
        Self { kind, message }
    }

    pub fn unknown_column(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::UnknownColumn, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::NotFound, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::PermissionDenied, message)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Other, message)
    }

    pub fn is_unknown_column(&self) -> bool {
        self.kind == QueryErrorKind::UnknownColumn
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == QueryErrorKind::NotFound
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of the server-side user-management precondition.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Admin is not attached to a clinic")]
    MissingClinic,

    #[error("Role lookup failed: {0}")]
    Lookup(#[from] QueryError),
}
