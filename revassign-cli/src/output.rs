//! JSON shapes printed by the CLI

use chrono::{DateTime, Utc};
use revassign_core::{
    Error, PrReviewerStat, PrStatus, PullRequest, Reassignment, Stats, TeamRoster, User,
    UserAssignmentStat,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PullRequestDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "mergedAt")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestDto {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.assigned_reviewers,
            created_at: pr.created_at,
            merged_at: pr.merged_at,
        }
    }
}

/// Pull request without reviewers or timestamps, used in review listings
#[derive(Debug, Serialize)]
pub struct PullRequestShortDto {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<PullRequest> for PullRequestShortDto {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.id,
            pull_request_name: pr.name,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PullRequestResponse {
    pub pr: PullRequestDto,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestDto,
    pub replaced_by: String,
}

impl From<Reassignment> for ReassignResponse {
    fn from(reassignment: Reassignment) -> Self {
        Self {
            pr: reassignment.pull_request.into(),
            replaced_by: reassignment.replaced_by,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamMemberDto {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct TeamDto {
    pub team_name: String,
    pub members: Vec<TeamMemberDto>,
}

impl From<TeamRoster> for TeamDto {
    fn from(roster: TeamRoster) -> Self {
        Self {
            team_name: roster.team.name,
            members: roster
                .members
                .into_iter()
                .map(|u| TeamMemberDto {
                    user_id: u.id,
                    username: u.username,
                    is_active: u.is_active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddTeamResponse {
    pub team: TeamDto,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub team_name: String,
    pub users: Vec<UserDto>,
}

#[derive(Debug, Serialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortDto>,
}

#[derive(Debug, Serialize)]
pub struct UserStatsDto {
    pub user_id: String,
    pub assignments: i64,
}

#[derive(Debug, Serialize)]
pub struct PrStatsDto {
    pub pull_request_id: String,
    pub reviewers: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub by_user: Vec<UserStatsDto>,
    pub by_pr: Vec<PrStatsDto>,
}

impl From<Stats> for StatsResponse {
    fn from(stats: Stats) -> Self {
        Self {
            by_user: stats
                .by_user
                .into_iter()
                .map(|UserAssignmentStat { user_id, assignments }| UserStatsDto {
                    user_id,
                    assignments,
                })
                .collect(),
            by_pr: stats
                .by_pr
                .into_iter()
                .map(|PrReviewerStat { pr_id, reviewers }| PrStatsDto {
                    pull_request_id: pr_id,
                    reviewers,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: ErrorObject {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }
}

/// Process exit status for a failed operation
///
/// 2 is shared with clap's usage errors.
pub fn exit_status(err: &Error) -> u8 {
    match err {
        Error::InvalidInput(_) => 2,
        Error::TeamNotFound(_) | Error::UserNotFound(_) | Error::PrNotFound(_) => 3,
        Error::TeamExists(_)
        | Error::PrExists(_)
        | Error::PrAlreadyMerged(_)
        | Error::NotAssigned { .. }
        | Error::NoCandidate(_) => 4,
        Error::Timeout => 5,
        Error::Cancelled => 130,
        Error::Storage(_) | Error::Config(_) | Error::Io(_) => 1,
    }
}
