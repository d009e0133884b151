//! Storage capabilities consumed by the services.
//!
//! Each entity gets its own trait so backends can be swapped and test
//! doubles substituted. Multi-row writes (`PullRequestStore::create`,
//! `PullRequestStore::update_reviewers`) must be all-or-nothing.
//!
//! Lookups that miss return the matching not-found error
//! (`Error::TeamNotFound`, `Error::UserNotFound`, `Error::PrNotFound`);
//! everything else the backend fails with is `Error::Storage`.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{PrReviewerStat, PrStatus, PullRequest, Team, User, UserAssignmentStat};
use crate::Result;

#[async_trait]
pub trait TeamStore: Send + Sync {
    /// Persist a new team. A duplicate name is `Error::TeamExists`.
    async fn create(&self, team: &Team) -> Result<()>;

    async fn exists_by_name(&self, name: &str) -> Result<bool>;

    async fn get_by_name(&self, name: &str) -> Result<Team>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<User>;

    /// Active members of a team, ordered by id
    async fn list_active_by_team(&self, team_name: &str) -> Result<Vec<User>>;

    /// All members of a team, ordered by id
    async fn list_by_team(&self, team_name: &str) -> Result<Vec<User>>;

    /// Set the active flag and return the updated user
    async fn set_active(&self, id: &str, is_active: bool) -> Result<User>;

    /// Insert or fully replace a user record
    async fn upsert(&self, user: &User) -> Result<()>;
}

#[async_trait]
pub trait PullRequestStore: Send + Sync {
    /// Persist a pull request together with its reviewer list, atomically.
    /// A duplicate id is `Error::PrExists`.
    async fn create(&self, pr: &PullRequest) -> Result<()>;

    async fn exists(&self, id: &str) -> Result<bool>;

    /// Fetch a pull request including its reviewers in assignment order
    async fn get_by_id(&self, id: &str) -> Result<PullRequest>;

    /// Pull requests the user reviews, ordered by creation time then id
    async fn list_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequest>>;

    /// Atomically replace the whole reviewer list
    async fn update_reviewers(&self, id: &str, reviewers: &[String]) -> Result<()>;

    async fn update_status_and_merged_at(
        &self,
        id: &str,
        status: PrStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<()>;
}

#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Assignments per reviewer, highest count first
    async fn count_assignments_by_user(&self) -> Result<Vec<UserAssignmentStat>>;

    /// Reviewers per pull request, highest count first
    async fn count_reviewers_by_pr(&self) -> Result<Vec<PrReviewerStat>>;
}
