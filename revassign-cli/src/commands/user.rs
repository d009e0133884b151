//! User commands

use clap::{ArgAction, Args, Subcommand};
use revassign_core::{Result, User};
use serde_json::Value;

use super::render;
use crate::app::App;
use crate::output::{
    PullRequestShortDto, UserDto, UserListResponse, UserResponse, UserReviewsResponse,
};

/// User management commands
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Create or replace a user
    Upsert {
        /// User id
        id: String,

        #[arg(long)]
        username: String,

        /// Team the user belongs to (must exist)
        #[arg(long)]
        team: String,

        /// Create the user as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Show a user
    Get {
        /// User id
        id: String,
    },

    /// Set whether a user can be picked as reviewer
    SetActive {
        /// User id
        id: String,

        /// true or false
        #[arg(action = ArgAction::Set)]
        active: bool,
    },

    /// List all users of a team
    List {
        #[arg(long)]
        team: String,
    },

    /// List pull requests the user reviews
    Reviews {
        /// User id
        id: String,
    },
}

impl UserArgs {
    /// Execute the user command
    pub async fn execute(&self, app: &App) -> Result<Value> {
        let ctx = app.context();
        match &self.command {
            UserCommand::Upsert {
                id,
                username,
                team,
                inactive,
            } => {
                let user = User::new(id, username, team).with_active(!inactive);
                let user = app.users.upsert_user(&ctx, user).await?;
                render(UserResponse { user: user.into() })
            }
            UserCommand::Get { id } => {
                let user = app.users.get_user(&ctx, id).await?;
                render(UserResponse { user: user.into() })
            }
            UserCommand::SetActive { id, active } => {
                let user = app.users.set_active(&ctx, id, *active).await?;
                render(UserResponse { user: user.into() })
            }
            UserCommand::List { team } => {
                let users = app.users.list_by_team(&ctx, team).await?;
                render(UserListResponse {
                    team_name: team.clone(),
                    users: users.into_iter().map(UserDto::from).collect(),
                })
            }
            UserCommand::Reviews { id } => {
                let prs = app.pull_requests.list_by_reviewer(&ctx, id).await?;
                render(UserReviewsResponse {
                    user_id: id.clone(),
                    pull_requests: prs.into_iter().map(PullRequestShortDto::from).collect(),
                })
            }
        }
    }
}
