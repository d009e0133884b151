//! Team commands

use std::str::FromStr;

use clap::{Args, Subcommand};
use revassign_core::{Error, Result, TeamMember};
use serde_json::Value;

use super::render;
use crate::app::App;
use crate::output::{AddTeamResponse, TeamDto};

/// Team management commands
#[derive(Args, Debug)]
pub struct TeamArgs {
    #[command(subcommand)]
    pub command: TeamCommand,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// Create a team together with its members
    Add {
        /// Team name
        name: String,

        /// Member as `user_id:username` (repeatable)
        #[arg(short, long = "member")]
        members: Vec<MemberSpec>,

        /// User id of a listed member to create as inactive (repeatable)
        #[arg(long)]
        inactive: Vec<String>,
    },

    /// Show a team and all of its members
    Get {
        /// Team name
        name: String,
    },
}

/// `user_id:username` pair given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSpec {
    pub user_id: String,
    pub username: String,
}

impl FromStr for MemberSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((user_id, username)) if !user_id.is_empty() && !username.is_empty() => {
                Ok(Self {
                    user_id: user_id.to_string(),
                    username: username.to_string(),
                })
            }
            _ => Err(format!("expected user_id:username, got '{}'", s)),
        }
    }
}

impl TeamArgs {
    /// Execute the team command
    pub async fn execute(&self, app: &App) -> Result<Value> {
        match &self.command {
            TeamCommand::Add {
                name,
                members,
                inactive,
            } => {
                let members = team_members(members, inactive)?;
                let roster = app.teams.add_team(&app.context(), name, &members).await?;
                render(AddTeamResponse {
                    team: roster.into(),
                })
            }
            TeamCommand::Get { name } => {
                let roster = app.teams.get_roster(&app.context(), name).await?;
                render(TeamDto::from(roster))
            }
        }
    }
}

fn team_members(members: &[MemberSpec], inactive: &[String]) -> Result<Vec<TeamMember>> {
    if let Some(unknown) = inactive
        .iter()
        .find(|id| !members.iter().any(|m| &m.user_id == *id))
    {
        return Err(Error::InvalidInput(format!(
            "inactive user {} is not listed as a member",
            unknown
        )));
    }

    Ok(members
        .iter()
        .map(|m| TeamMember {
            user_id: m.user_id.clone(),
            username: m.username.clone(),
            is_active: !inactive.contains(&m.user_id),
        })
        .collect())
}
