//! Domain models for teams, users and pull requests

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A team of users; reviewers are drawn from the author's team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A user bound to exactly one team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: String,

    /// Display name
    pub username: String,

    /// Team the user belongs to
    pub team_name: String,

    /// Inactive users are never picked as reviewers
    pub is_active: bool,
}

impl User {
    /// Create an active user
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        team_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            team_name: team_name.into(),
            is_active: true,
        }
    }

    /// Set the active flag
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Pull request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(PrStatus::Open),
            "MERGED" => Ok(PrStatus::Merged),
            other => Err(Error::InvalidInput(format!(
                "unknown pull request status: {}",
                other
            ))),
        }
    }
}

/// A pull request with its ordered reviewer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Unique pull request identifier
    pub id: String,

    /// Human readable title
    pub name: String,

    /// Author's user id
    pub author_id: String,

    /// Current status
    pub status: PrStatus,

    /// Assigned reviewer ids, at most two, never the author
    pub assigned_reviewers: Vec<String>,

    /// When the pull request was created
    pub created_at: DateTime<Utc>,

    /// Set exactly when `status` is `Merged`
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Create an open pull request
    pub fn open(
        id: impl Into<String>,
        name: impl Into<String>,
        author_id: impl Into<String>,
        assigned_reviewers: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            author_id: author_id.into(),
            status: PrStatus::Open,
            assigned_reviewers,
            created_at,
            merged_at: None,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.status == PrStatus::Merged
    }

    /// Position of a reviewer in the reviewer list
    pub fn reviewer_position(&self, reviewer_id: &str) -> Option<usize> {
        self.assigned_reviewers.iter().position(|id| id == reviewer_id)
    }

    /// Mark the pull request merged at the given time
    pub fn mark_merged(&mut self, at: DateTime<Utc>) {
        self.status = PrStatus::Merged;
        self.merged_at = Some(at);
    }
}

/// Number of review assignments held by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAssignmentStat {
    pub user_id: String,
    pub assignments: i64,
}

/// Number of reviewers assigned to one pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrReviewerStat {
    pub pr_id: String,
    pub reviewers: i64,
}

/// Both assignment aggregates, computed together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub by_user: Vec<UserAssignmentStat>,
    pub by_pr: Vec<PrReviewerStat>,
}
