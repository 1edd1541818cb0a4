use serde::Deserialize;
use thiserror::Error;

use crate::client::{user_segment, GitHubClient, GitHubRequestError, Upstream};

/// The slice of a GitHub repository listing entry the stats need.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoSummary {
    #[serde(default)]
    pub stargazers_count: u64,
}

#[derive(Debug, Error)]
pub enum FetchUserReposError {
    #[error("FetchUserRepos: {source}")]
    Request {
        #[from]
        source: GitHubRequestError,
    },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },
}

/// First page (up to 100) of the user's repositories, most recently updated first.
pub async fn fetch_user_repos(
    client: &GitHubClient,
    username: &str,
) -> Result<Vec<RepoSummary>, FetchUserReposError> {
    let path = format!("/users/{}/repos", user_segment(username));
    let body = client
        .get_text(
            Upstream::RestApi,
            &path,
            &[("per_page", "100"), ("sort", "updated")],
        )
        .await?;

    let repos: Vec<RepoSummary> = serde_json::from_str(&body)?;
    Ok(repos)
}

pub fn total_stars(repos: &[RepoSummary]) -> u64 {
    repos.iter().map(|repo| repo.stargazers_count).sum()
}
