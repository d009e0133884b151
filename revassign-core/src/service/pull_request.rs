//! Pull request lifecycle and reviewer assignment
//!
//! Creation picks up to two reviewers from the author's active team
//! mates. Reassignment swaps exactly one reviewer for another eligible
//! member of the old reviewer's team, keeping its position in the list.
//!
//! The existence check on creation and the status check on reassignment
//! are not isolated from concurrent writers. A duplicate create is still
//! rejected by the store (`PrExists`); two concurrent reassignments on the
//! same pull request race and the last committed reviewer list wins.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::require;
use crate::assignment::{select_initial_reviewers, select_replacement, substitute_reviewer};
use crate::context::RequestContext;
use crate::models::{PrStatus, PullRequest};
use crate::random::RandomSource;
use crate::store::{PullRequestStore, TeamStore, UserStore};
use crate::{Error, Result};

/// Outcome of a reviewer reassignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reassignment {
    /// The pull request with its updated reviewer list
    pub pull_request: PullRequest,
    /// Id of the newly assigned reviewer
    pub replaced_by: String,
}

/// Create, merge and reassign pull requests
#[derive(Clone)]
pub struct PullRequestService {
    pull_requests: Arc<dyn PullRequestStore>,
    users: Arc<dyn UserStore>,
    teams: Arc<dyn TeamStore>,
    rng: RandomSource,
}

impl PullRequestService {
    pub fn new(
        pull_requests: Arc<dyn PullRequestStore>,
        users: Arc<dyn UserStore>,
        teams: Arc<dyn TeamStore>,
        rng: RandomSource,
    ) -> Self {
        Self {
            pull_requests,
            users,
            teams,
            rng,
        }
    }

    /// Create an open pull request with automatically chosen reviewers
    pub async fn create(
        &self,
        ctx: &RequestContext,
        pr_id: &str,
        name: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        info!(pr_id, pr_name = name, author_id, "creating pull request");
        require("pull_request_id", pr_id)?;
        require("pull_request_name", name)?;
        require("author_id", author_id)?;

        ctx.run(self.create_inner(pr_id, name, author_id)).await
    }

    async fn create_inner(&self, pr_id: &str, name: &str, author_id: &str) -> Result<PullRequest> {
        let exists = self.pull_requests.exists(pr_id).await.inspect_err(|e| {
            error!(pr_id, error = %e, "failed to check pull request existence");
        })?;
        if exists {
            warn!(pr_id, "pull request already exists");
            return Err(Error::PrExists(pr_id.to_string()));
        }

        let author = self.users.get_by_id(author_id).await.inspect_err(|e| match e {
            Error::UserNotFound(_) => warn!(author_id, "author not found"),
            e => error!(author_id, error = %e, "failed to fetch author"),
        })?;

        let team = self
            .teams
            .get_by_name(&author.team_name)
            .await
            .inspect_err(|e| match e {
                Error::TeamNotFound(_) => {
                    warn!(author_id, team_name = %author.team_name, "team not found for author")
                }
                e => error!(team_name = %author.team_name, error = %e, "failed to fetch team"),
            })?;

        let candidates = self
            .users
            .list_active_by_team(&team.name)
            .await
            .inspect_err(|e| {
                error!(team_name = %team.name, error = %e, "failed to list active reviewers");
            })?;

        let reviewers = select_initial_reviewers(candidates, &author.id, &self.rng);
        debug!(pr_id, ?reviewers, "selected reviewers");

        let pr = PullRequest::open(pr_id, name, author_id, reviewers, Utc::now());
        self.pull_requests.create(&pr).await.inspect_err(|e| match e {
            Error::PrExists(_) => warn!(pr_id, "pull request created concurrently"),
            e => error!(pr_id, error = %e, "failed to create pull request"),
        })?;

        info!(
            pr_id,
            author_id,
            reviewers_count = pr.assigned_reviewers.len(),
            "pull request created"
        );
        Ok(pr)
    }

    /// Merge a pull request. Merging a merged pull request returns it unchanged.
    pub async fn merge(&self, ctx: &RequestContext, pr_id: &str) -> Result<PullRequest> {
        info!(pr_id, "merging pull request");
        require("pull_request_id", pr_id)?;

        ctx.run(async {
            let mut pr = self.fetch(pr_id).await?;
            if pr.is_merged() {
                info!(pr_id, "pull request already merged");
                return Ok(pr);
            }

            let now = Utc::now();
            self.pull_requests
                .update_status_and_merged_at(&pr.id, PrStatus::Merged, Some(now))
                .await
                .inspect_err(|e| {
                    error!(pr_id, error = %e, "failed to update pull request status");
                })?;

            pr.mark_merged(now);
            info!(pr_id, "pull request merged");
            Ok(pr)
        })
        .await
    }

    /// Replace `old_reviewer_id` with a random eligible team mate
    pub async fn reassign(
        &self,
        ctx: &RequestContext,
        pr_id: &str,
        old_reviewer_id: &str,
    ) -> Result<Reassignment> {
        info!(pr_id, old_reviewer_id, "reassigning reviewer");
        require("pull_request_id", pr_id)?;
        require("old_reviewer_id", old_reviewer_id)?;

        ctx.run(self.reassign_inner(pr_id, old_reviewer_id)).await
    }

    async fn reassign_inner(&self, pr_id: &str, old_reviewer_id: &str) -> Result<Reassignment> {
        let mut pr = self.fetch(pr_id).await?;

        if pr.is_merged() {
            warn!(pr_id, "attempt to reassign reviewer of merged pull request");
            return Err(Error::PrAlreadyMerged(pr_id.to_string()));
        }

        let Some(position) = pr.reviewer_position(old_reviewer_id) else {
            warn!(pr_id, old_reviewer_id, "reviewer is not assigned to pull request");
            return Err(Error::NotAssigned {
                pr_id: pr_id.to_string(),
                reviewer_id: old_reviewer_id.to_string(),
            });
        };

        let old_reviewer = self
            .users
            .get_by_id(old_reviewer_id)
            .await
            .inspect_err(|e| match e {
                Error::UserNotFound(_) => warn!(old_reviewer_id, "old reviewer not found"),
                e => error!(old_reviewer_id, error = %e, "failed to fetch old reviewer"),
            })?;

        let candidates = self
            .users
            .list_active_by_team(&old_reviewer.team_name)
            .await
            .inspect_err(|e| {
                error!(
                    team_name = %old_reviewer.team_name,
                    error = %e,
                    "failed to list active candidates"
                );
            })?;

        let Some(new_reviewer) = select_replacement(&candidates, &pr, old_reviewer_id, &self.rng)
        else {
            warn!(pr_id, old_reviewer_id, "no candidate reviewer available");
            return Err(Error::NoCandidate(pr_id.to_string()));
        };

        let reviewers = substitute_reviewer(&pr.assigned_reviewers, position, &new_reviewer);
        self.pull_requests
            .update_reviewers(&pr.id, &reviewers)
            .await
            .inspect_err(|e| {
                error!(pr_id, error = %e, "failed to update reviewers");
            })?;

        info!(pr_id, old_reviewer_id, new_reviewer_id = %new_reviewer, "reviewer reassigned");
        pr.assigned_reviewers = reviewers;
        Ok(Reassignment {
            pull_request: pr,
            replaced_by: new_reviewer,
        })
    }

    /// All pull requests the user is assigned to review
    pub async fn list_by_reviewer(
        &self,
        ctx: &RequestContext,
        reviewer_id: &str,
    ) -> Result<Vec<PullRequest>> {
        info!(reviewer_id, "listing pull requests by reviewer");
        require("user_id", reviewer_id)?;

        let prs = ctx
            .run(async {
                self.pull_requests
                    .list_by_reviewer(reviewer_id)
                    .await
                    .inspect_err(|e| {
                        error!(reviewer_id, error = %e, "failed to list pull requests by reviewer");
                    })
            })
            .await?;

        info!(reviewer_id, count = prs.len(), "pull requests listed");
        Ok(prs)
    }

    async fn fetch(&self, pr_id: &str) -> Result<PullRequest> {
        self.pull_requests
            .get_by_id(pr_id)
            .await
            .inspect_err(|e| match e {
                Error::PrNotFound(_) => warn!(pr_id, "pull request not found"),
                e => error!(pr_id, error = %e, "failed to fetch pull request"),
            })
    }
}
