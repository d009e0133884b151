//! revassign-db - SQLite persistence for revassign
//!
//! Implements the storage traits from `revassign-core` on top of a sqlx
//! connection pool. Schema changes live in `migrations/` and are applied
//! on connect.

mod connection;
pub mod error;
pub mod repos;

pub use connection::{Database, DatabaseConfig};
pub use error::{DbError, Result};
pub use repos::{PullRequestRepo, StatsRepo, TeamRepo, UserRepo};
