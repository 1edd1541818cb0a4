use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::client::{user_segment, GitHubClient, GitHubRequestError, Upstream};

/// GitHub serves at most this many pages of public events.
pub const MAX_EVENT_PAGES: u32 = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl GitHubEvent {
    pub fn is_push(&self) -> bool {
        self.kind == "PushEvent"
    }

    /// Commits carried by a push: `payload.size`, else the length of `payload.commits`.
    pub fn commit_count(&self) -> u64 {
        if let Some(size) = self.payload.get("size").and_then(|size| size.as_u64()) {
            return size;
        }
        self.payload
            .get("commits")
            .and_then(|commits| commits.as_array())
            .map(|commits| commits.len() as u64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum FetchUserEventsError {
    #[error("FetchUserEvents: {source}")]
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

/// One page (1-based, 100 per page) of the user's public events.
pub async fn fetch_user_events(
    client: &GitHubClient,
    username: &str,
    page: u32,
) -> Result<Vec<GitHubEvent>, FetchUserEventsError> {
    let path = format!("/users/{}/events/public", user_segment(username));
    let page = page.to_string();
    let body = client
        .get_text(
            Upstream::RestApi,
            &path,
            &[("per_page", "100"), ("page", page.as_str())],
        )
        .await?;

    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(json: serde_json::Value) -> GitHubEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn prefers_size_over_commit_list() {
        let push = event(serde_json::json!({
            "type": "PushEvent",
            "created_at": "2024-03-01T10:00:00Z",
            "payload": { "size": 4, "commits": [{}, {}] }
        }));
        assert!(push.is_push());
        assert_eq!(push.commit_count(), 4);
    }

    #[test]
    fn counts_commit_list_without_size() {
        let push = event(serde_json::json!({
            "type": "PushEvent",
            "created_at": "2024-03-01T10:00:00Z",
            "payload": { "commits": [{}, {}, {}] }
        }));
        assert_eq!(push.commit_count(), 3);
    }

    #[test]
    fn other_events_carry_nothing() {
        let watch = event(serde_json::json!({
            "type": "WatchEvent",
            "created_at": "2024-03-01T10:00:00Z",
            "payload": { "action": "started" }
        }));
        assert!(!watch.is_push());
        assert_eq!(watch.commit_count(), 0);
    }
}
