//! Team management

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::require;
use crate::context::RequestContext;
use crate::models::{Team, User};
use crate::store::{TeamStore, UserStore};
use crate::{Error, Result};

/// A member supplied when adding a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

/// A team together with all of its members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub team: Team,
    pub members: Vec<User>,
}

/// Create and fetch teams
#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamStore>,
    users: Arc<dyn UserStore>,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamStore>, users: Arc<dyn UserStore>) -> Self {
        Self { teams, users }
    }

    /// Create an empty team
    pub async fn create_team(&self, ctx: &RequestContext, name: &str) -> Result<Team> {
        info!(team_name = name, "creating team");
        require("team_name", name)?;

        ctx.run(self.create_team_inner(name)).await
    }

    async fn create_team_inner(&self, name: &str) -> Result<Team> {
        let exists = self.teams.exists_by_name(name).await.inspect_err(|e| {
            error!(team_name = name, error = %e, "failed to check team existence");
        })?;
        if exists {
            warn!(team_name = name, "team already exists");
            return Err(Error::TeamExists(name.to_string()));
        }

        let team = Team::new(name);
        self.teams.create(&team).await.inspect_err(|e| {
            if !e.is_domain() {
                error!(team_name = name, error = %e, "failed to create team");
            }
        })?;

        info!(team_name = name, "team created");
        Ok(team)
    }

    /// Create a team and upsert each member into it.
    ///
    /// Fails with `TeamExists` before any member is written.
    pub async fn add_team(
        &self,
        ctx: &RequestContext,
        name: &str,
        members: &[TeamMember],
    ) -> Result<TeamRoster> {
        info!(team_name = name, members = members.len(), "adding team");
        require("team_name", name)?;
        for member in members {
            require("user_id", &member.user_id)?;
            require("username", &member.username)?;
        }

        ctx.run(async {
            let team = self.create_team_inner(name).await?;

            let mut stored = Vec::with_capacity(members.len());
            for member in members {
                let user = User::new(&member.user_id, &member.username, &team.name)
                    .with_active(member.is_active);
                self.users.upsert(&user).await.inspect_err(|e| {
                    error!(user_id = %user.id, error = %e, "failed to upsert team member");
                })?;
                stored.push(user);
            }

            info!(team_name = name, members = stored.len(), "team added");
            Ok(TeamRoster {
                team,
                members: stored,
            })
        })
        .await
    }

    /// Fetch a team by name
    pub async fn get_team(&self, ctx: &RequestContext, name: &str) -> Result<Team> {
        info!(team_name = name, "fetching team");
        require("team_name", name)?;

        ctx.run(self.get_team_inner(name)).await
    }

    async fn get_team_inner(&self, name: &str) -> Result<Team> {
        self.teams.get_by_name(name).await.inspect_err(|e| match e {
            Error::TeamNotFound(_) => warn!(team_name = name, "team not found"),
            e => error!(team_name = name, error = %e, "failed to fetch team"),
        })
    }

    /// Fetch a team with all members, active and inactive
    pub async fn get_roster(&self, ctx: &RequestContext, name: &str) -> Result<TeamRoster> {
        info!(team_name = name, "fetching team roster");
        require("team_name", name)?;

        ctx.run(async {
            let team = self.get_team_inner(name).await?;
            let members = self.users.list_by_team(&team.name).await.inspect_err(|e| {
                error!(team_name = name, error = %e, "failed to list team members");
            })?;
            Ok(TeamRoster { team, members })
        })
        .await
    }
}
