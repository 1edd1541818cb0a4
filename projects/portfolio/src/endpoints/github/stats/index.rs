use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::aggregate::GitHubStatsAggregator;
use crate::endpoints::error_response;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Username is required")]
    MissingUsername,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::MissingUsername => {
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
        }
    }
}

/// First non-blank `username` in the query string; repeats are tolerated.
fn find_username(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .filter(|(key, _)| key == "username")
        .map(|(_, value)| value.trim())
        .find(|value| !value.is_empty())
}

/// Axum handler: GET /api/github-stats?username=
pub async fn handler(
    Extension(aggregator): Extension<Arc<GitHubStatsAggregator>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(username) = find_username(&params) else {
        return HandlerError::MissingUsername.into_response();
    };

    let stats = aggregator.aggregate(username).await;
    (StatusCode::OK, Json(stats)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn picks_the_first_non_blank_username() {
        assert_eq!(find_username(&params(&[("username", "a"), ("username", "b")])), Some("a"));
        assert_eq!(find_username(&params(&[("username", " "), ("username", " b ")])), Some("b"));
        assert_eq!(find_username(&params(&[("user", "a")])), None);
        assert_eq!(find_username(&[]), None);
    }
}
