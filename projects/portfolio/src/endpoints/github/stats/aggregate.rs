use interfaces_github_stats::{
    repos::{fetch_user_repos, total_stars},
    GitHubClient,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::strategies::{default_strategies, CommitCountStrategy};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStatsResult {
    pub total_stars: u64,
    pub commits_last_year: u64,
}

/// Merges star totals and a last-year commit estimate for one user.
///
/// Every upstream failure degrades the affected number to zero; `aggregate`
/// itself cannot fail.
pub struct GitHubStatsAggregator {
    client: GitHubClient,
    strategies: Vec<Box<dyn CommitCountStrategy>>,
}

impl GitHubStatsAggregator {
    pub fn new(client: GitHubClient) -> Self {
        let strategies = default_strategies(&client);
        Self::with_strategies(client, strategies)
    }

    pub fn with_strategies(
        client: GitHubClient,
        strategies: Vec<Box<dyn CommitCountStrategy>>,
    ) -> Self {
        Self { client, strategies }
    }

    pub async fn aggregate(&self, username: &str) -> GitHubStatsResult {
        let total_stars = match fetch_user_repos(&self.client, username).await {
            Ok(repos) => total_stars(&repos),
            Err(err) => {
                warn!(username, error = %err, "UpstreamError: repository listing failed, reporting zero stars");
                0
            }
        };

        let commits_last_year = self.commits_last_year(username).await;
        info!(username, total_stars, commits_last_year, "github stats aggregated");

        GitHubStatsResult {
            total_stars,
            commits_last_year,
        }
    }

    /// First non-zero answer of the strategy chain, else zero.
    async fn commits_last_year(&self, username: &str) -> u64 {
        for strategy in &self.strategies {
            match strategy.attempt(username).await {
                Some(count) if count > 0 => {
                    debug!(username, strategy = strategy.name(), count, "commit count resolved");
                    return count;
                }
                Some(_) => debug!(username, strategy = strategy.name(), "strategy reported zero"),
                None => debug!(username, strategy = strategy.name(), "strategy failed"),
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use interfaces_github_stats::GitHubEndpoints;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    struct Fixed {
        answer: Option<u64>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommitCountStrategy for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn attempt(&self, _username: &str) -> Option<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    fn unreachable_client() -> GitHubClient {
        // port 9 (discard) is closed locally, so every call fails fast
        GitHubClient::new(
            reqwest::Client::new(),
            GitHubEndpoints {
                api_base: "http://127.0.0.1:9".to_string(),
                web_base: "http://127.0.0.1:9".to_string(),
                contributions_base: "http://127.0.0.1:9".to_string(),
            },
            None,
            "Portfolio-App",
        )
    }

    #[tokio::test]
    async fn chain_stops_at_first_non_zero() {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = |answer| -> Box<dyn CommitCountStrategy> {
            Box::new(Fixed {
                answer,
                calls: calls.clone(),
            })
        };
        let aggregator = GitHubStatsAggregator::with_strategies(
            unreachable_client(),
            vec![strategy(None), strategy(Some(0)), strategy(Some(42)), strategy(Some(7))],
        );

        let stats = aggregator.aggregate("octocat").await;
        assert_eq!(
            stats,
            GitHubStatsResult {
                total_stars: 0,
                commits_last_year: 42
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn everything_failing_is_all_zero() {
        let aggregator = GitHubStatsAggregator::new(unreachable_client());
        assert_eq!(aggregator.aggregate("octocat").await, GitHubStatsResult::default());
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(GitHubStatsResult {
            total_stars: 1,
            commits_last_year: 2,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "totalStars": 1, "commitsLastYear": 2 }));
    }
}
