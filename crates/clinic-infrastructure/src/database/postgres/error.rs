//! sqlx error classification

use clinic_core::error::QueryError;

const UNDEFINED_COLUMN: &str = "42703";
const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Maps a driver error onto the kinds the resolution services act on.
/// SQLSTATE codes win; anything else is classified from its message.
pub(crate) fn classify(err: sqlx::Error) -> QueryError {
    match &err {
        sqlx::Error::RowNotFound => QueryError::not_found(err.to_string()),
        sqlx::Error::Database(db) => {
            let message = db.message().to_string();
            match db.code().as_deref() {
                Some(UNDEFINED_COLUMN) => QueryError::unknown_column(message),
                Some(INSUFFICIENT_PRIVILEGE) => QueryError::permission_denied(message),
                _ => QueryError::from_message(message),
            }
        }
        _ => QueryError::from_message(err.to_string()),
    }
}
