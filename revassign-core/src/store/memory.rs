//! In-memory implementation of the storage traits.
//!
//! All state lives in one map set behind a `RwLock`, so every write is
//! trivially atomic. Used as the test double for the services.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{PullRequestStore, StatsStore, TeamStore, UserStore};
use crate::models::{PrReviewerStat, PrStatus, PullRequest, Team, User, UserAssignmentStat};
use crate::{Error, Result};

#[derive(Default)]
struct State {
    teams: BTreeMap<String, Team>,
    users: BTreeMap<String, User>,
    pull_requests: BTreeMap<String, PullRequest>,
}

/// In-memory store implementing every storage trait.
///
/// `set_unavailable(true)` makes every call fail with `Error::Storage`,
/// which lets tests exercise backend failure paths.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a backend outage
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::storage(std::io::Error::other(
                "in-memory store unavailable",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TeamStore for InMemoryStore {
    async fn create(&self, team: &Team) -> Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.teams.contains_key(&team.name) {
            return Err(Error::TeamExists(team.name.clone()));
        }
        state.teams.insert(team.name.clone(), team.clone());
        Ok(())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        self.check_available()?;
        Ok(self.state.read().await.teams.contains_key(name))
    }

    async fn get_by_name(&self, name: &str) -> Result<Team> {
        self.check_available()?;
        self.state
            .read()
            .await
            .teams
            .get(name)
            .cloned()
            .ok_or_else(|| Error::TeamNotFound(name.to_string()))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_by_id(&self, id: &str) -> Result<User> {
        self.check_available()?;
        self.state
            .read()
            .await
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    async fn list_active_by_team(&self, team_name: &str) -> Result<Vec<User>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.team_name == team_name && u.is_active)
            .cloned()
            .collect())
    }

    async fn list_by_team(&self, team_name: &str) -> Result<Vec<User>> {
        self.check_available()?;
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| u.team_name == team_name)
            .cloned()
            .collect())
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<User> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| Error::UserNotFound(id.to_string()))?;
        user.is_active = is_active;
        Ok(user.clone())
    }

    async fn upsert(&self, user: &User) -> Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if !state.teams.contains_key(&user.team_name) {
            return Err(Error::TeamNotFound(user.team_name.clone()));
        }
        state.users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}

#[async_trait]
impl PullRequestStore for InMemoryStore {
    async fn create(&self, pr: &PullRequest) -> Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        if state.pull_requests.contains_key(&pr.id) {
            return Err(Error::PrExists(pr.id.clone()));
        }
        state.pull_requests.insert(pr.id.clone(), pr.clone());
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        self.check_available()?;
        Ok(self.state.read().await.pull_requests.contains_key(id))
    }

    async fn get_by_id(&self, id: &str) -> Result<PullRequest> {
        self.check_available()?;
        self.state
            .read()
            .await
            .pull_requests
            .get(id)
            .cloned()
            .ok_or_else(|| Error::PrNotFound(id.to_string()))
    }

    async fn list_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequest>> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut prs: Vec<PullRequest> = state
            .pull_requests
            .values()
            .filter(|pr| pr.assigned_reviewers.iter().any(|r| r == reviewer_id))
            .cloned()
            .collect();
        prs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(prs)
    }

    async fn update_reviewers(&self, id: &str, reviewers: &[String]) -> Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(id)
            .ok_or_else(|| Error::PrNotFound(id.to_string()))?;
        pr.assigned_reviewers = reviewers.to_vec();
        Ok(())
    }

    async fn update_status_and_merged_at(
        &self,
        id: &str,
        status: PrStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.check_available()?;
        let mut state = self.state.write().await;
        let pr = state
            .pull_requests
            .get_mut(id)
            .ok_or_else(|| Error::PrNotFound(id.to_string()))?;
        pr.status = status;
        pr.merged_at = merged_at;
        Ok(())
    }
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn count_assignments_by_user(&self) -> Result<Vec<UserAssignmentStat>> {
        self.check_available()?;
        let state = self.state.read().await;
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for pr in state.pull_requests.values() {
            for reviewer in &pr.assigned_reviewers {
                *counts.entry(reviewer.as_str()).or_default() += 1;
            }
        }

        let mut stats: Vec<UserAssignmentStat> = counts
            .into_iter()
            .map(|(user_id, assignments)| UserAssignmentStat {
                user_id: user_id.to_string(),
                assignments,
            })
            .collect();
        stats.sort_by(|a, b| {
            b.assignments
                .cmp(&a.assignments)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(stats)
    }

    async fn count_reviewers_by_pr(&self) -> Result<Vec<PrReviewerStat>> {
        self.check_available()?;
        let state = self.state.read().await;
        // Pull requests without reviewers have no rows in a relational store
        let mut stats: Vec<PrReviewerStat> = state
            .pull_requests
            .values()
            .filter(|pr| !pr.assigned_reviewers.is_empty())
            .map(|pr| PrReviewerStat {
                pr_id: pr.id.clone(),
                reviewers: pr.assigned_reviewers.len() as i64,
            })
            .collect();
        stats.sort_by(|a, b| b.reviewers.cmp(&a.reviewers).then_with(|| a.pr_id.cmp(&b.pr_id)));
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store() -> InMemoryStore {
        let store = InMemoryStore::new();
        TeamStore::create(&store, &Team::new("backend")).await.unwrap();
        store.upsert(&User::new("u1", "alice", "backend")).await.unwrap();
        store.upsert(&User::new("u2", "bob", "backend")).await.unwrap();
        store
            .upsert(&User::new("u3", "carol", "backend").with_active(false))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_duplicate_team_rejected() {
        let store = seeded_store().await;
        let err = TeamStore::create(&store, &Team::new("backend")).await.unwrap_err();
        assert!(matches!(err, Error::TeamExists(name) if name == "backend"));
    }

    #[tokio::test]
    async fn test_active_listing_skips_inactive() {
        let store = seeded_store().await;
        let active = store.list_active_by_team("backend").await.unwrap();
        let ids: Vec<_> = active.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2"]);

        let all = store.list_by_team("backend").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_set_active_missing_user() {
        let store = seeded_store().await;
        let err = store.set_active("nobody", true).await.unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_with_storage_error() {
        let store = seeded_store().await;
        store.set_unavailable(true);
        let err = UserStore::get_by_id(&store, "u1").await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        store.set_unavailable(false);
        assert!(UserStore::get_by_id(&store, "u1").await.is_ok());
    }

    #[tokio::test]
    async fn test_stats_ordering() {
        let store = seeded_store().await;
        let now = Utc::now();
        PullRequestStore::create(
            &store,
            &PullRequest::open("pr1", "One", "u1", vec!["u2".into(), "u3".into()], now),
        )
        .await
        .unwrap();
        PullRequestStore::create(
            &store,
            &PullRequest::open("pr2", "Two", "u1", vec!["u2".into()], now),
        )
        .await
        .unwrap();
        PullRequestStore::create(&store, &PullRequest::open("pr3", "Three", "u2", vec![], now))
            .await
            .unwrap();

        let by_user = store.count_assignments_by_user().await.unwrap();
        assert_eq!(by_user[0].user_id, "u2");
        assert_eq!(by_user[0].assignments, 2);
        assert_eq!(by_user[1].user_id, "u3");

        let by_pr = store.count_reviewers_by_pr().await.unwrap();
        assert_eq!(by_pr.len(), 2);
        assert_eq!(by_pr[0].pr_id, "pr1");
        assert_eq!(by_pr[0].reviewers, 2);
    }
}
