//! Team repository

use async_trait::async_trait;
use revassign_core::{Error, Result, Team, TeamStore};
use sqlx::SqlitePool;

use super::{insert_error, storage_error};

/// Repository for teams
#[derive(Clone)]
pub struct TeamRepo {
    pool: SqlitePool,
}

impl TeamRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for TeamRepo {
    async fn create(&self, team: &Team) -> Result<()> {
        sqlx::query("INSERT INTO teams (name) VALUES (?)")
            .bind(&team.name)
            .execute(&self.pool)
            .await
            .map_err(|e| insert_error(e, || Error::TeamExists(team.name.clone())))?;
        Ok(())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM teams WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(row.is_some())
    }

    async fn get_by_name(&self, name: &str) -> Result<Team> {
        let row: Option<(String,)> = sqlx::query_as("SELECT name FROM teams WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.map(|(name,)| Team { name })
            .ok_or_else(|| Error::TeamNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.teams();

        assert!(!repo.exists_by_name("backend").await.unwrap());
        repo.create(&Team::new("backend")).await.unwrap();
        assert!(repo.exists_by_name("backend").await.unwrap());
        assert_eq!(repo.get_by_name("backend").await.unwrap().name, "backend");
    }

    #[tokio::test]
    async fn test_duplicate_maps_to_team_exists() {
        let db = Database::in_memory().await.unwrap();
        let repo = db.teams();

        repo.create(&Team::new("backend")).await.unwrap();
        let err = repo.create(&Team::new("backend")).await.unwrap_err();
        assert!(matches!(err, Error::TeamExists(name) if name == "backend"));
    }

    #[tokio::test]
    async fn test_missing_team() {
        let db = Database::in_memory().await.unwrap();
        let err = db.teams().get_by_name("ghost").await.unwrap_err();
        assert!(matches!(err, Error::TeamNotFound(_)));
    }
}
