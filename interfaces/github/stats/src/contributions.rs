use serde::Deserialize;
use thiserror::Error;

use crate::client::{user_segment, GitHubClient, GitHubRequestError, Upstream};

#[derive(Debug, Clone, Deserialize)]
pub struct ContributionsSummary {
    #[serde(rename = "totalContributions", default)]
    pub total_contributions: u64,
}

#[derive(Debug, Error)]
pub enum FetchContributionsSummaryError {
    #[error("FetchContributionsSummary: {source}")]
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

/// Last-year contribution total from the third-party aggregation API.
pub async fn fetch_contributions_summary(
    client: &GitHubClient,
    username: &str,
) -> Result<ContributionsSummary, FetchContributionsSummaryError> {
    let path = format!("/{}.json", user_segment(username));
    let body = client
        .get_text(Upstream::Contributions, &path, &[])
        .await?;

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GitHubEndpoints;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn reads_total_contributions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/octocat.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "contributions": [],
                "totalContributions": 812
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::new(
            reqwest::Client::new(),
            GitHubEndpoints {
                contributions_base: server.uri(),
                ..GitHubEndpoints::default()
            },
            None,
            "Portfolio-App",
        );
        let summary = fetch_contributions_summary(&client, "octocat").await.unwrap();
        assert_eq!(summary.total_contributions, 812);
    }

    #[test]
    fn missing_total_defaults_to_zero() {
        let summary: ContributionsSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary.total_contributions, 0);
    }
}
