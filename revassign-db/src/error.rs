//! Error types for database operations

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be mapped to a domain value
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl DbError {
    /// Whether the underlying failure is a primary key or unique violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::Sqlx(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }
}

impl From<DbError> for revassign_core::Error {
    fn from(err: DbError) -> Self {
        revassign_core::Error::storage(err)
    }
}

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, DbError>;
