//! User management

use std::sync::Arc;

use tracing::{error, info, warn};

use super::require;
use crate::context::RequestContext;
use crate::models::User;
use crate::store::{TeamStore, UserStore};
use crate::{Error, Result};

/// Upsert users, toggle their active flag, list team members
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    teams: Arc<dyn TeamStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, teams: Arc<dyn TeamStore>) -> Self {
        Self { users, teams }
    }

    /// Insert or fully replace a user. The target team must exist.
    pub async fn upsert_user(&self, ctx: &RequestContext, user: User) -> Result<User> {
        info!(
            user_id = %user.id,
            username = %user.username,
            team_name = %user.team_name,
            is_active = user.is_active,
            "upserting user"
        );
        require("user_id", &user.id)?;
        require("username", &user.username)?;
        require("team_name", &user.team_name)?;

        ctx.run(async {
            let exists = self
                .teams
                .exists_by_name(&user.team_name)
                .await
                .inspect_err(|e| {
                    error!(
                        team_name = %user.team_name,
                        error = %e,
                        "failed to check team existence"
                    );
                })?;
            if !exists {
                warn!(team_name = %user.team_name, "team does not exist");
                return Err(Error::TeamNotFound(user.team_name.clone()));
            }

            self.users.upsert(&user).await.inspect_err(|e| {
                error!(user_id = %user.id, error = %e, "failed to upsert user");
            })?;

            info!(user_id = %user.id, "user upserted");
            Ok(user)
        })
        .await
    }

    /// Fetch a user by id
    pub async fn get_user(&self, ctx: &RequestContext, user_id: &str) -> Result<User> {
        info!(user_id, "fetching user");
        require("user_id", user_id)?;

        ctx.run(async {
            self.users.get_by_id(user_id).await.inspect_err(|e| match e {
                Error::UserNotFound(_) => warn!(user_id, "user not found"),
                e => error!(user_id, error = %e, "failed to fetch user"),
            })
        })
        .await
    }

    /// Set the active flag and return the updated user
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        is_active: bool,
    ) -> Result<User> {
        info!(user_id, is_active, "setting user active state");
        require("user_id", user_id)?;

        let user = ctx
            .run(async {
                self.users
                    .set_active(user_id, is_active)
                    .await
                    .inspect_err(|e| match e {
                        Error::UserNotFound(_) => warn!(user_id, "user not found"),
                        e => error!(user_id, error = %e, "failed to update user active state"),
                    })
            })
            .await?;

        info!(user_id, is_active, "user active state updated");
        Ok(user)
    }

    /// All members of a team, active and inactive
    pub async fn list_by_team(&self, ctx: &RequestContext, team_name: &str) -> Result<Vec<User>> {
        info!(team_name, "listing users by team");
        require("team_name", team_name)?;

        let users = ctx
            .run(async {
                self.users.list_by_team(team_name).await.inspect_err(|e| {
                    error!(team_name, error = %e, "failed to list users by team");
                })
            })
            .await?;

        info!(team_name, count = users.len(), "users listed");
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::fixtures::backend_team;

    #[tokio::test]
    async fn test_upsert_inserts_then_replaces() {
        let store = backend_team(&[], &[]).await;
        TeamStore::create(store.as_ref(), &crate::models::Team::new("frontend"))
            .await
            .unwrap();
        let svc = UserService::new(store.clone(), store.clone());
        let ctx = RequestContext::background();

        svc.upsert_user(&ctx, User::new("u1", "alice", "backend"))
            .await
            .unwrap();
        svc.upsert_user(&ctx, User::new("u1", "alice2", "frontend").with_active(false))
            .await
            .unwrap();

        let user = svc.get_user(&ctx, "u1").await.unwrap();
        assert_eq!(user.username, "alice2");
        assert_eq!(user.team_name, "frontend");
        assert!(!user.is_active);
        assert!(svc.list_by_team(&ctx, "backend").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_requires_existing_team() {
        let store = backend_team(&[], &[]).await;
        let svc = UserService::new(store.clone(), store.clone());

        let err = svc
            .upsert_user(&RequestContext::background(), User::new("u1", "alice", "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TeamNotFound(name) if name == "ghost"));
    }

    #[tokio::test]
    async fn test_upsert_rejects_empty_fields() {
        let store = backend_team(&[], &[]).await;
        let svc = UserService::new(store.clone(), store.clone());
        let ctx = RequestContext::background();

        for user in [
            User::new("", "alice", "backend"),
            User::new("u1", "", "backend"),
            User::new("u1", "alice", ""),
        ] {
            let err = svc.upsert_user(&ctx, user).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
    }

    #[tokio::test]
    async fn test_set_active_toggles() {
        let store = backend_team(&["u1"], &[]).await;
        let svc = UserService::new(store.clone(), store.clone());
        let ctx = RequestContext::background();

        let user = svc.set_active(&ctx, "u1", false).await.unwrap();
        assert!(!user.is_active);
        assert!(store.list_active_by_team("backend").await.unwrap().is_empty());

        let user = svc.set_active(&ctx, "u1", true).await.unwrap();
        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_set_active_unknown_user() {
        let store = backend_team(&[], &[]).await;
        let svc = UserService::new(store.clone(), store.clone());

        let err = svc
            .set_active(&RequestContext::background(), "ghost", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UserNotFound(_)));

        let err = svc
            .set_active(&RequestContext::background(), "", true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_list_by_team_includes_inactive() {
        let store = backend_team(&["u1", "u2"], &["u3"]).await;
        let svc = UserService::new(store.clone(), store.clone());

        let users = svc
            .list_by_team(&RequestContext::background(), "backend")
            .await
            .unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u1", "u2", "u3"]);
    }
}
