//! User repository

use async_trait::async_trait;
use revassign_core::{Error, Result, User, UserStore};
use sqlx::SqlitePool;

use super::storage_error;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    team_name: String,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            team_name: row.team_name,
            is_active: row.is_active,
        }
    }
}

/// Repository for users
#[derive(Clone)]
pub struct UserRepo {
    pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepo {
    async fn get_by_id(&self, id: &str) -> Result<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, team_name, is_active FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(User::from)
        .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    async fn list_active_by_team(&self, team_name: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, team_name, is_active
            FROM users
            WHERE team_name = ? AND is_active = TRUE
            ORDER BY id
            "#,
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn list_by_team(&self, team_name: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, team_name, is_active FROM users WHERE team_name = ? ORDER BY id",
        )
        .bind(team_name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn set_active(&self, id: &str, is_active: bool) -> Result<User> {
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users SET is_active = ?
            WHERE id = ?
            RETURNING id, username, team_name, is_active
            "#,
        )
        .bind(is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(User::from)
        .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    async fn upsert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, team_name, is_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                username = excluded.username,
                team_name = excluded.team_name,
                is_active = excluded.is_active
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.team_name)
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}
