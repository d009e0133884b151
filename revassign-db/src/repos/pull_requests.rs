//! Pull request repository
//!
//! Reviewers live in `pull_request_reviewers` with an explicit `position`
//! so the list reads back in assignment order.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use revassign_core::{Error, PrStatus, PullRequest, PullRequestStore, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use super::{insert_error, storage_error};
use crate::error::DbError;

#[derive(Debug, sqlx::FromRow)]
struct PullRequestRow {
    id: String,
    name: String,
    author_id: String,
    status: String,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl PullRequestRow {
    fn into_pull_request(self, assigned_reviewers: Vec<String>) -> Result<PullRequest> {
        let status = self.status.parse::<PrStatus>().map_err(|_| {
            DbError::InvalidData(format!(
                "pull request {} has unknown status {}",
                self.id, self.status
            ))
        })?;

        Ok(PullRequest {
            id: self.id,
            name: self.name,
            author_id: self.author_id,
            status,
            assigned_reviewers,
            created_at: self.created_at,
            merged_at: self.merged_at,
        })
    }
}

/// Repository for pull requests and their reviewer links
#[derive(Clone)]
pub struct PullRequestRepo {
    pool: SqlitePool,
}

impl PullRequestRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_reviewers(&self, pr_id: &str) -> Result<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT reviewer_id FROM pull_request_reviewers WHERE pr_id = ? ORDER BY position",
        )
        .bind(pr_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)
    }

    async fn insert_reviewers(
        tx: &mut Transaction<'_, Sqlite>,
        pr_id: &str,
        reviewers: &[String],
    ) -> Result<()> {
        for (position, reviewer_id) in reviewers.iter().enumerate() {
            sqlx::query(
                "INSERT INTO pull_request_reviewers (pr_id, reviewer_id, position) VALUES (?, ?, ?)",
            )
            .bind(pr_id)
            .bind(reviewer_id)
            .bind(position as i64)
            .execute(&mut **tx)
            .await
            .map_err(storage_error)?;
        }
        Ok(())
    }
}

#[async_trait]
impl PullRequestStore for PullRequestRepo {
    async fn create(&self, pr: &PullRequest) -> Result<()> {
        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query(
            r#"
            INSERT INTO pull_requests (id, name, author_id, status, created_at, merged_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pr.id)
        .bind(&pr.name)
        .bind(&pr.author_id)
        .bind(pr.status.as_str())
        .bind(pr.created_at)
        .bind(pr.merged_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_error(e, || Error::PrExists(pr.id.clone())))?;

        Self::insert_reviewers(&mut tx, &pr.id, &pr.assigned_reviewers).await?;

        tx.commit().await.map_err(storage_error)?;
        debug!(pr_id = %pr.id, reviewers = pr.assigned_reviewers.len(), "pull request stored");
        Ok(())
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM pull_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.is_some())
    }

    async fn get_by_id(&self, id: &str) -> Result<PullRequest> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT id, name, author_id, status, created_at, merged_at
            FROM pull_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| Error::PrNotFound(id.to_string()))?;

        let reviewers = self.fetch_reviewers(&row.id).await?;
        row.into_pull_request(reviewers)
    }

    async fn list_by_reviewer(&self, reviewer_id: &str) -> Result<Vec<PullRequest>> {
        let rows = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT pr.id, pr.name, pr.author_id, pr.status, pr.created_at, pr.merged_at
            FROM pull_requests pr
            JOIN pull_request_reviewers r ON pr.id = r.pr_id
            WHERE r.reviewer_id = ?
            ORDER BY pr.created_at, pr.id
            "#,
        )
        .bind(reviewer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut prs = Vec::with_capacity(rows.len());
        for row in rows {
            let reviewers = self.fetch_reviewers(&row.id).await?;
            prs.push(row.into_pull_request(reviewers)?);
        }
        Ok(prs)
    }

    async fn update_reviewers(&self, id: &str, reviewers: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM pull_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error)?;
        if exists.is_none() {
            return Err(Error::PrNotFound(id.to_string()));
        }

        sqlx::query("DELETE FROM pull_request_reviewers WHERE pr_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        Self::insert_reviewers(&mut tx, id, reviewers).await?;

        tx.commit().await.map_err(storage_error)?;
        debug!(pr_id = id, ?reviewers, "reviewers replaced");
        Ok(())
    }

    async fn update_status_and_merged_at(
        &self,
        id: &str,
        status: PrStatus,
        merged_at: Option<DateTime<Utc>>,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE pull_requests SET status = ?, merged_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(merged_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(Error::PrNotFound(id.to_string()));
        }
        Ok(())
    }
}
