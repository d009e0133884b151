//! Reviewer selection
//!
//! Pure functions over candidate lists. The services fetch the active
//! team members from storage and hand them here; nothing in this module
//! touches storage.

use std::collections::HashSet;

use crate::models::{PullRequest, User};
use crate::random::RandomSource;

/// Upper bound on reviewers assigned at creation
pub const MAX_REVIEWERS: usize = 2;

/// Choose the initial reviewers of a new pull request.
///
/// The author is removed from `candidates`, the rest are shuffled
/// uniformly and the first `min(MAX_REVIEWERS, pool size)` ids are
/// returned. No weighting by current workload.
pub fn select_initial_reviewers(
    candidates: Vec<User>,
    author_id: &str,
    rng: &RandomSource,
) -> Vec<String> {
    let mut pool: Vec<String> = candidates
        .into_iter()
        .filter(|u| u.id != author_id)
        .map(|u| u.id)
        .collect();

    rng.shuffle(&mut pool);
    pool.truncate(MAX_REVIEWERS);
    pool
}

/// Choose a replacement for `old_reviewer_id`.
///
/// Excludes the old reviewer, the author and everyone already on the
/// reviewer list, then draws one candidate uniformly. `None` when
/// nobody is eligible.
pub fn select_replacement(
    candidates: &[User],
    pr: &PullRequest,
    old_reviewer_id: &str,
    rng: &RandomSource,
) -> Option<String> {
    let assigned: HashSet<&str> = pr.assigned_reviewers.iter().map(String::as_str).collect();

    let pool: Vec<&User> = candidates
        .iter()
        .filter(|u| u.id != old_reviewer_id)
        .filter(|u| u.id != pr.author_id)
        .filter(|u| !assigned.contains(u.id.as_str()))
        .collect();

    rng.index(pool.len()).map(|idx| pool[idx].id.clone())
}

/// Reviewer list with the entry at `position` replaced
pub fn substitute_reviewer(
    reviewers: &[String],
    position: usize,
    new_reviewer: &str,
) -> Vec<String> {
    let mut updated = reviewers.to_vec();
    updated[position] = new_reviewer.to_string();
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn team(ids: &[&str]) -> Vec<User> {
        ids.iter()
            .map(|id| User::new(*id, format!("name-{}", id), "backend"))
            .collect()
    }

    fn open_pr(author: &str, reviewers: &[&str]) -> PullRequest {
        PullRequest::open(
            "pr1",
            "Add search",
            author,
            reviewers.iter().map(|r| r.to_string()).collect(),
            Utc::now(),
        )
    }

    #[test]
    fn test_initial_reviewers_exclude_author() {
        for seed in 0..50 {
            let picked = select_initial_reviewers(
                team(&["u1", "u2", "u3", "u4"]),
                "u1",
                &RandomSource::seeded(seed),
            );
            assert_eq!(picked.len(), 2);
            assert!(!picked.contains(&"u1".to_string()));
            assert_ne!(picked[0], picked[1]);
        }
    }

    #[test]
    fn test_initial_reviewers_bounded_by_pool() {
        let rng = RandomSource::seeded(5);
        assert!(select_initial_reviewers(team(&["u1"]), "u1", &rng).is_empty());
        assert_eq!(select_initial_reviewers(team(&["u1", "u2"]), "u1", &rng), vec!["u2"]);
        assert!(select_initial_reviewers(Vec::new(), "u1", &rng).is_empty());
    }

    #[test]
    fn test_initial_reviewers_reach_every_candidate() {
        let mut seen = HashSet::new();
        for seed in 0..200 {
            let picked = select_initial_reviewers(
                team(&["u1", "u2", "u3", "u4", "u5"]),
                "u1",
                &RandomSource::seeded(seed),
            );
            seen.extend(picked);
        }
        let expected: HashSet<String> = ["u2", "u3", "u4", "u5"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_replacement_excludes_author_old_and_assigned() {
        let pr = open_pr("u1", &["u2", "u3"]);
        for seed in 0..50 {
            let picked = select_replacement(
                &team(&["u1", "u2", "u3", "u4", "u5"]),
                &pr,
                "u2",
                &RandomSource::seeded(seed),
            )
            .unwrap();
            assert!(picked == "u4" || picked == "u5");
        }
    }

    #[test]
    fn test_replacement_none_when_pool_empty() {
        let pr = open_pr("u1", &["u2", "u3"]);
        let picked = select_replacement(
            &team(&["u1", "u2", "u3"]),
            &pr,
            "u2",
            &RandomSource::seeded(9),
        );
        assert_eq!(picked, None);
    }

    #[test]
    fn test_substitute_keeps_position() {
        let reviewers = vec!["u2".to_string(), "u3".to_string()];
        assert_eq!(substitute_reviewer(&reviewers, 0, "u4"), vec!["u4", "u3"]);
        assert_eq!(substitute_reviewer(&reviewers, 1, "u4"), vec!["u2", "u4"]);
    }
}
