//! Pull request commands

use clap::{Args, Subcommand};
use revassign_core::Result;
use serde_json::Value;

use super::render;
use crate::app::App;
use crate::output::{PullRequestResponse, ReassignResponse};

/// Pull request lifecycle commands
#[derive(Args, Debug)]
pub struct PrArgs {
    #[command(subcommand)]
    pub command: PrCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrCommand {
    /// Open a pull request and assign up to two reviewers from the author's team
    Create {
        /// Pull request id
        id: String,

        /// Pull request title
        #[arg(short, long)]
        name: String,

        /// Author user id
        #[arg(short, long)]
        author: String,
    },

    /// Mark a pull request merged (repeating is a no-op)
    Merge {
        /// Pull request id
        id: String,
    },

    /// Replace one reviewer with another active member of their team
    Reassign {
        /// Pull request id
        id: String,

        /// Reviewer to replace
        #[arg(long = "old-reviewer")]
        old_reviewer: String,
    },
}

impl PrArgs {
    /// Execute the pull request command
    pub async fn execute(&self, app: &App) -> Result<Value> {
        let ctx = app.context();
        match &self.command {
            PrCommand::Create { id, name, author } => {
                let pr = app.pull_requests.create(&ctx, id, name, author).await?;
                render(PullRequestResponse { pr: pr.into() })
            }
            PrCommand::Merge { id } => {
                let pr = app.pull_requests.merge(&ctx, id).await?;
                render(PullRequestResponse { pr: pr.into() })
            }
            PrCommand::Reassign { id, old_reviewer } => {
                let reassignment = app.pull_requests.reassign(&ctx, id, old_reviewer).await?;
                render(ReassignResponse::from(reassignment))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{test_app, App};
    use revassign_core::TeamMember;

    async fn seeded_team(app: &App, ids: &[&str]) {
        let members: Vec<_> = ids
            .iter()
            .map(|id| TeamMember {
                user_id: id.to_string(),
                username: format!("user-{}", id),
                is_active: true,
            })
            .collect();
        app.teams
            .add_team(&app.context(), "backend", &members)
            .await
            .unwrap();
    }

    fn create(id: &str, author: &str) -> PrArgs {
        PrArgs {
            command: PrCommand::Create {
                id: id.into(),
                name: format!("Change {}", id),
                author: author.into(),
            },
        }
    }

    #[tokio::test]
    async fn test_create_merge_reassign_flow() {
        let app = test_app().await;
        seeded_team(&app, &["u1", "u2", "u3", "u4"]).await;

        let body = create("pr-1", "u1").execute(&app).await.unwrap();
        let reviewers = body["pr"]["assigned_reviewers"].as_array().unwrap().clone();
        assert_eq!(reviewers.len(), 2);
        assert!(!reviewers.contains(&Value::from("u1")));
        assert_eq!(body["pr"]["status"], "OPEN");
        assert!(body["pr"]["mergedAt"].is_null());

        let old = reviewers[0].as_str().unwrap().to_string();
        let body = PrArgs {
            command: PrCommand::Reassign {
                id: "pr-1".into(),
                old_reviewer: old.clone(),
            },
        }
        .execute(&app)
        .await
        .unwrap();
        let replaced_by = body["replaced_by"].as_str().unwrap();
        assert_ne!(replaced_by, old);
        assert_ne!(replaced_by, "u1");
        assert_eq!(body["pr"]["assigned_reviewers"][0], replaced_by);
        assert_eq!(body["pr"]["assigned_reviewers"][1], reviewers[1]);

        let merge = PrArgs {
            command: PrCommand::Merge { id: "pr-1".into() },
        };
        let first = merge.execute(&app).await.unwrap();
        let second = merge.execute(&app).await.unwrap();
        assert_eq!(first["pr"]["status"], "MERGED");
        let merged_at = |body: &Value| {
            body["pr"]["mergedAt"]
                .as_str()
                .unwrap()
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap()
                .timestamp_millis()
        };
        assert_eq!(merged_at(&first), merged_at(&second));

        let err = PrArgs {
            command: PrCommand::Reassign {
                id: "pr-1".into(),
                old_reviewer: replaced_by.to_string(),
            },
        }
        .execute(&app)
        .await
        .unwrap_err();
        assert_eq!(err.code(), "PR_MERGED");
    }

    #[tokio::test]
    async fn test_duplicate_create() {
        let app = test_app().await;
        seeded_team(&app, &["u1"]).await;

        let body = create("pr-1", "u1").execute(&app).await.unwrap();
        assert!(body["pr"]["assigned_reviewers"].as_array().unwrap().is_empty());

        let err = create("pr-1", "u1").execute(&app).await.unwrap_err();
        assert_eq!(err.code(), "PR_EXISTS");
    }
}
