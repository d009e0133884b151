//! Composition root: storage, services and per-request context

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use revassign_core::{
    Config, PullRequestService, PullRequestStore, RandomSource, RequestContext, StatsService,
    StatsStore, TeamService, TeamStore, UserService, UserStore,
};
use revassign_db::{Database, DatabaseConfig};
use tokio_util::sync::CancellationToken;

/// Services wired to one database
pub struct App {
    db: Database,
    pub teams: TeamService,
    pub users: UserService,
    pub pull_requests: PullRequestService,
    pub stats: StatsService,
    request_timeout: Duration,
    cancel: CancellationToken,
}

impl App {
    /// Open the configured database and build the services
    pub async fn open(config: &Config, cancel: CancellationToken) -> anyhow::Result<Self> {
        let db = Database::connect(DatabaseConfig::from(&config.database))
            .await
            .with_context(|| {
                format!(
                    "Failed to open database at {}",
                    config.database.path.display()
                )
            })?;

        Ok(Self::new(
            db,
            RandomSource::from_entropy(),
            config.service.request_timeout,
            cancel,
        ))
    }

    pub fn new(
        db: Database,
        random: RandomSource,
        request_timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let teams: Arc<dyn TeamStore> = Arc::new(db.teams());
        let users: Arc<dyn UserStore> = Arc::new(db.users());
        let pull_requests: Arc<dyn PullRequestStore> = Arc::new(db.pull_requests());
        let stats: Arc<dyn StatsStore> = Arc::new(db.stats());

        Self {
            teams: TeamService::new(teams.clone(), users.clone()),
            users: UserService::new(users.clone(), teams.clone()),
            pull_requests: PullRequestService::new(pull_requests, users, teams, random),
            stats: StatsService::new(stats),
            db,
            request_timeout,
            cancel,
        }
    }

    /// Fresh context for one operation
    pub fn context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout).with_cancellation(self.cancel.clone())
    }

    pub async fn close(self) {
        self.db.close().await;
    }
}

#[cfg(test)]
pub(crate) async fn test_app() -> App {
    let db = Database::in_memory().await.unwrap();
    App::new(
        db,
        RandomSource::seeded(7),
        Duration::from_secs(4),
        CancellationToken::new(),
    )
}
