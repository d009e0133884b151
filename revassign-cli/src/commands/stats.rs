//! Assignment statistics command

use revassign_core::Result;
use serde_json::Value;

use super::render;
use crate::app::App;
use crate::output::StatsResponse;

/// Execute the stats command
pub async fn execute(app: &App) -> Result<Value> {
    let stats = app.stats.get_stats(&app.context()).await?;
    render(StatsResponse::from(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use revassign_core::TeamMember;

    #[tokio::test]
    async fn test_stats_body() {
        let app = test_app().await;
        let ctx = app.context();
        let members: Vec<_> = ["u1", "u2"]
            .iter()
            .map(|id| TeamMember {
                user_id: id.to_string(),
                username: id.to_string(),
                is_active: true,
            })
            .collect();
        app.teams.add_team(&ctx, "backend", &members).await.unwrap();
        app.pull_requests.create(&ctx, "pr-1", "Fix", "u1").await.unwrap();

        let body = execute(&app).await.unwrap();
        assert_eq!(body["by_user"][0]["user_id"], "u2");
        assert_eq!(body["by_user"][0]["assignments"], 1);
        assert_eq!(body["by_pr"][0]["pull_request_id"], "pr-1");
        assert_eq!(body["by_pr"][0]["reviewers"], 1);
    }
}
