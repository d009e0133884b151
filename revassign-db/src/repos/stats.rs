//! Assignment statistics

use async_trait::async_trait;
use revassign_core::{PrReviewerStat, Result, StatsStore, UserAssignmentStat};
use sqlx::SqlitePool;

use super::storage_error;

/// Read-only aggregate queries over reviewer links
#[derive(Clone)]
pub struct StatsRepo {
    pool: SqlitePool,
}

impl StatsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsStore for StatsRepo {
    async fn count_assignments_by_user(&self) -> Result<Vec<UserAssignmentStat>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT reviewer_id, COUNT(*) AS assignments
            FROM pull_request_reviewers
            GROUP BY reviewer_id
            ORDER BY assignments DESC, reviewer_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, assignments)| UserAssignmentStat {
                user_id,
                assignments,
            })
            .collect())
    }

    async fn count_reviewers_by_pr(&self) -> Result<Vec<PrReviewerStat>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT pr_id, COUNT(*) AS reviewers
            FROM pull_request_reviewers
            GROUP BY pr_id
            ORDER BY reviewers DESC, pr_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows
            .into_iter()
            .map(|(pr_id, reviewers)| PrReviewerStat { pr_id, reviewers })
            .collect())
    }
}
