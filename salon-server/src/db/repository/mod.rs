//! Repository Module
//!
//! Free functions per table over `sqlx` runtime queries. Functions that are
//! also used inside a transaction are generic over [`sqlx::SqliteExecutor`]
//! or take a `&mut SqliteConnection`.

pub mod booking;
pub mod customer;
pub mod notification;
pub mod outbox;
pub mod reward;
pub mod service;
pub mod staff;
pub mod tenant;
pub mod user;
pub mod visit;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// SQLITE_BUSY 及其扩展码（BUSY_SNAPSHOT 等）：写锁被其他连接占用
    #[error("Database busy: {0}")]
    Busy(String),
}

/// Primary result code of an SQLite error is the low byte of the extended code
fn is_busy(db_err: &dyn sqlx::error::DatabaseError) -> bool {
    db_err
        .code()
        .and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| c & 0xff == 5)
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate(db_err.message().to_string());
            }
            if is_busy(db_err) {
                return RepoError::Busy(db_err.message().to_string());
            }
        }
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) | RepoError::Busy(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_errors_map_to_app_codes() {
        let err: AppError = RepoError::NotFound("Booking 1".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = RepoError::Duplicate("visit.booking_id".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);

        let err: AppError = RepoError::Busy("database is locked".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
