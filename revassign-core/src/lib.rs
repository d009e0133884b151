//! revassign core - reviewer assignment for pull requests
//!
//! Teams, users and pull requests live behind the storage traits in
//! [`store`]. The services in [`service`] implement the pull request
//! lifecycle: creation with automatic reviewer selection, merge, and
//! single-slot reviewer reassignment.

pub mod assignment;
pub mod config;
pub mod context;
pub mod error;
pub mod models;
pub mod random;
pub mod service;
pub mod store;

pub use config::Config;
pub use context::RequestContext;
pub use error::{Error, Result};
pub use models::{PrReviewerStat, PrStatus, PullRequest, Stats, Team, User, UserAssignmentStat};
pub use random::RandomSource;
pub use service::{
    PullRequestService, Reassignment, StatsService, TeamMember, TeamRoster, TeamService,
    UserService,
};
pub use store::{InMemoryStore, PullRequestStore, StatsStore, TeamStore, UserStore};
