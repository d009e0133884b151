//! SQLite implementations of the core storage traits

pub mod pull_requests;
pub mod stats;
pub mod teams;
pub mod users;

pub use pull_requests::PullRequestRepo;
pub use stats::StatsRepo;
pub use teams::TeamRepo;
pub use users::UserRepo;

use crate::error::DbError;

/// Convert a driver error into the opaque core storage error
fn storage_error(err: sqlx::Error) -> revassign_core::Error {
    tracing::error!(error = %err, "database query failed");
    DbError::from(err).into()
}

/// Like [`storage_error`], but a unique-key violation becomes `on_conflict`
fn insert_error(
    err: sqlx::Error,
    on_conflict: impl FnOnce() -> revassign_core::Error,
) -> revassign_core::Error {
    let err = DbError::from(err);
    if err.is_unique_violation() {
        return on_conflict();
    }
    tracing::error!(error = %err, "database insert failed");
    err.into()
}
