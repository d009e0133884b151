//! Assignment statistics

use std::sync::Arc;

use tracing::{error, info};

use crate::context::RequestContext;
use crate::models::Stats;
use crate::store::StatsStore;
use crate::Result;

/// Read-only aggregates over reviewer assignments, computed per call
#[derive(Clone)]
pub struct StatsService {
    stats: Arc<dyn StatsStore>,
}

impl StatsService {
    pub fn new(stats: Arc<dyn StatsStore>) -> Self {
        Self { stats }
    }

    pub async fn get_stats(&self, ctx: &RequestContext) -> Result<Stats> {
        info!("collecting statistics");

        let stats = ctx
            .run(async {
                let by_user = self.stats.count_assignments_by_user().await.inspect_err(|e| {
                    error!(error = %e, "failed to count assignments by user");
                })?;
                let by_pr = self.stats.count_reviewers_by_pr().await.inspect_err(|e| {
                    error!(error = %e, "failed to count reviewers by pull request");
                })?;
                Ok(Stats { by_user, by_pr })
            })
            .await?;

        info!(
            users = stats.by_user.len(),
            pull_requests = stats.by_pr.len(),
            "statistics collected"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomSource;
    use crate::service::fixtures::backend_team;
    use crate::service::PullRequestService;
    use crate::Error;

    #[tokio::test]
    async fn test_stats_follow_assignments() {
        let store = backend_team(&["u1", "u2", "u3"], &[]).await;
        let prs = PullRequestService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            RandomSource::seeded(21),
        );
        let ctx = RequestContext::background();
        prs.create(&ctx, "pr1", "One", "u1").await.unwrap();
        prs.create(&ctx, "pr2", "Two", "u1").await.unwrap();

        let stats = StatsService::new(store.clone()).get_stats(&ctx).await.unwrap();

        // u1 authored both, u2 and u3 review both
        assert_eq!(stats.by_user.len(), 2);
        assert!(stats.by_user.iter().all(|s| s.assignments == 2));
        assert!(stats.by_user.iter().all(|s| s.user_id != "u1"));
        assert_eq!(stats.by_pr.len(), 2);
        assert!(stats.by_pr.iter().all(|s| s.reviewers == 2));
    }

    #[tokio::test]
    async fn test_stats_empty() {
        let store = backend_team(&[], &[]).await;
        let stats = StatsService::new(store)
            .get_stats(&RequestContext::background())
            .await
            .unwrap();
        assert!(stats.by_user.is_empty());
        assert!(stats.by_pr.is_empty());
    }

    #[tokio::test]
    async fn test_stats_storage_failure() {
        let store = backend_team(&[], &[]).await;
        store.set_unavailable(true);
        let err = StatsService::new(store)
            .get_stats(&RequestContext::background())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
