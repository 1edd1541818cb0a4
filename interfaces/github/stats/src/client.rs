use reqwest::{header, Client, StatusCode};
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_WEB_BASE: &str = "https://github.com";
pub const DEFAULT_CONTRIBUTIONS_BASE: &str = "https://github-contributions-api.deno.dev";
pub const DEFAULT_USER_AGENT: &str = "Portfolio-App";

/// Base URLs of every upstream the stats pipeline talks to.
#[derive(Debug, Clone)]
pub struct GitHubEndpoints {
    pub api_base: String,
    pub web_base: String,
    pub contributions_base: String,
}

impl Default for GitHubEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            contributions_base: DEFAULT_CONTRIBUTIONS_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    endpoints: GitHubEndpoints,
    token: Option<String>,
    user_agent: String,
}

/// Which upstream a request targets. Only the REST API gets the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Upstream {
    RestApi,
    Web,
    Contributions,
}

impl GitHubClient {
    pub fn new(
        http: Client,
        endpoints: GitHubEndpoints,
        token: Option<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoints,
            token,
            user_agent: user_agent.into(),
        }
    }

    pub(crate) fn url(&self, upstream: Upstream, path: &str) -> String {
        let base = match upstream {
            Upstream::RestApi => &self.endpoints.api_base,
            Upstream::Web => &self.endpoints.web_base,
            Upstream::Contributions => &self.endpoints.contributions_base,
        };
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    /// GETs `path` on `upstream` and returns the body of a 2xx response.
    pub(crate) async fn get_text(
        &self,
        upstream: Upstream,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, GitHubRequestError> {
        let url = self.url(upstream, path);
        let mut request = self
            .http
            .get(&url)
            .query(query)
            .header(header::USER_AGENT, &self.user_agent);

        if upstream == Upstream::RestApi {
            request = request.header(header::ACCEPT, "application/vnd.github.v3+json");
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|source| GitHubRequestError::RequestSend { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitHubRequestError::UnexpectedStatus { url, status });
        }

        response
            .text()
            .await
            .map_err(|source| GitHubRequestError::ResponseRead { source })
    }
}

/// Percent-encodes a username for use as a single path segment.
pub(crate) fn user_segment(username: &str) -> String {
    urlencoding::encode(username).into_owned()
}

#[derive(Debug, Error)]
pub enum GitHubRequestError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("UnexpectedStatus: {status} from {url}")]
    UnexpectedStatus { url: String, status: StatusCode },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = GitHubClient::new(
            Client::new(),
            GitHubEndpoints {
                api_base: "http://127.0.0.1:9/".to_string(),
                ..GitHubEndpoints::default()
            },
            None,
            DEFAULT_USER_AGENT,
        );
        assert_eq!(
            client.url(Upstream::RestApi, "/users/octocat/repos"),
            "http://127.0.0.1:9/users/octocat/repos"
        );
        assert_eq!(
            client.url(Upstream::Web, "/users/octocat/contributions"),
            "https://github.com/users/octocat/contributions"
        );
    }

    #[test]
    fn username_is_a_single_segment() {
        assert_eq!(user_segment("octo/../cat"), "octo%2F..%2Fcat");
        assert_eq!(user_segment("octo-cat"), "octo-cat");
    }
}
