//! Services invoked by the request-handling layer
//!
//! Each service validates its input, then runs the storage work inside
//! the caller's [`RequestContext`](crate::RequestContext). None of them
//! hold mutable state of their own.

pub mod pull_request;
pub mod stats;
pub mod team;
pub mod user;

pub use pull_request::{PullRequestService, Reassignment};
pub use stats::StatsService;
pub use team::{TeamMember, TeamRoster, TeamService};
pub use user::UserService;

use crate::{Error, Result};

/// Reject empty required fields before any storage access
fn require(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        tracing::warn!(field, "invalid input: empty required field");
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}
