//! Error types for reviewer assignment

use thiserror::Error;

/// Result type alias for reviewer assignment operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reviewer assignment operations
#[derive(Error, Debug)]
pub enum Error {
    /// A team with this name already exists
    #[error("team already exists: {0}")]
    TeamExists(String),

    /// No team with this name
    #[error("team not found: {0}")]
    TeamNotFound(String),

    /// No user with this id
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// A pull request with this id already exists
    #[error("pull request already exists: {0}")]
    PrExists(String),

    /// No pull request with this id
    #[error("pull request not found: {0}")]
    PrNotFound(String),

    /// Reviewers of a merged pull request cannot change
    #[error("pull request is already merged: {0}")]
    PrAlreadyMerged(String),

    /// The user is not in the pull request's reviewer list
    #[error("user {reviewer_id} is not assigned as reviewer of {pr_id}")]
    NotAssigned { pr_id: String, reviewer_id: String },

    /// Nobody is left to take over the review
    #[error("no candidate reviewer available for {0}")]
    NoCandidate(String),

    /// A required field was empty
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request deadline passed before the operation finished
    #[error("operation timed out")]
    Timeout,

    /// The caller cancelled the request
    #[error("operation cancelled")]
    Cancelled,

    /// Opaque failure from the storage backend
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable error code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            Error::TeamExists(_) => "TEAM_EXISTS",
            Error::PrExists(_) => "PR_EXISTS",
            Error::PrAlreadyMerged(_) => "PR_MERGED",
            Error::NotAssigned { .. } => "NOT_ASSIGNED",
            Error::NoCandidate(_) => "NO_CANDIDATE",
            Error::TeamNotFound(_) | Error::UserNotFound(_) | Error::PrNotFound(_) => "NOT_FOUND",
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::Timeout => "TIMEOUT",
            Error::Cancelled => "CANCELLED",
            Error::Storage(_) | Error::Config(_) | Error::Io(_) => "INTERNAL",
        }
    }

    /// Whether this is an expected business outcome rather than an
    /// infrastructure failure
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            Error::Timeout | Error::Cancelled | Error::Storage(_) | Error::Config(_) | Error::Io(_)
        )
    }

    /// Wrap an arbitrary backend error
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Storage(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds_share_code() {
        assert_eq!(Error::TeamNotFound("t".into()).code(), "NOT_FOUND");
        assert_eq!(Error::UserNotFound("u".into()).code(), "NOT_FOUND");
        assert_eq!(Error::PrNotFound("p".into()).code(), "NOT_FOUND");
    }

    #[test]
    fn test_domain_classification() {
        assert!(Error::NoCandidate("pr1".into()).is_domain());
        assert!(Error::InvalidInput("x".into()).is_domain());
        assert!(!Error::Timeout.is_domain());
        assert!(!Error::storage(std::io::Error::other("disk")).is_domain());
    }

    #[test]
    fn test_not_assigned_message() {
        let err = Error::NotAssigned {
            pr_id: "pr1".into(),
            reviewer_id: "u10".into(),
        };
        assert_eq!(err.code(), "NOT_ASSIGNED");
        assert_eq!(err.to_string(), "user u10 is not assigned as reviewer of pr1");
    }
}
