use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use interfaces_github_stats::{
    calendar::{fetch_contribution_calendar, parse_contribution_count},
    contributions::fetch_contributions_summary,
    events::{fetch_user_events, GitHubEvent, MAX_EVENT_PAGES},
    GitHubClient,
};
use tracing::{debug, warn};

const EVENTS_PER_PAGE: usize = 100;

/// One way of estimating how many commits a user made in the last year.
///
/// `None` means the strategy could not produce a number. The aggregator also
/// moves on after `Some(0)`.
#[async_trait]
pub trait CommitCountStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, username: &str) -> Option<u64>;
}

/// The third-party contributions aggregation API.
pub struct ContributionsApiStrategy {
    client: GitHubClient,
}

impl ContributionsApiStrategy {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommitCountStrategy for ContributionsApiStrategy {
    fn name(&self) -> &'static str {
        "contributions_api"
    }

    async fn attempt(&self, username: &str) -> Option<u64> {
        match fetch_contributions_summary(&self.client, username).await {
            Ok(summary) => Some(summary.total_contributions),
            Err(err) => {
                warn!(username, error = %err, "contributions API unavailable");
                None
            }
        }
    }
}

/// Scrapes the public contribution calendar on github.com.
pub struct CalendarScrapeStrategy {
    client: GitHubClient,
}

impl CalendarScrapeStrategy {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CommitCountStrategy for CalendarScrapeStrategy {
    fn name(&self) -> &'static str {
        "calendar_scrape"
    }

    async fn attempt(&self, username: &str) -> Option<u64> {
        let html = match fetch_contribution_calendar(&self.client, username).await {
            Ok(html) => html,
            Err(err) => {
                warn!(username, error = %err, "contribution calendar unavailable");
                return None;
            }
        };
        let count = parse_contribution_count(&html);
        if count.is_none() {
            debug!(username, "contribution calendar markup not recognised");
        }
        count
    }
}

/// Sums commits of public push events from the last 365 days.
pub struct PushEventsStrategy {
    client: GitHubClient,
}

impl PushEventsStrategy {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }
}

/// Commits pushed within the year before `now`.
pub fn count_recent_push_commits(events: &[GitHubEvent], now: DateTime<Utc>) -> u64 {
    let since = now - Duration::days(365);
    events
        .iter()
        .filter(|event| event.is_push() && event.created_at >= since)
        .map(GitHubEvent::commit_count)
        .sum()
}

#[async_trait]
impl CommitCountStrategy for PushEventsStrategy {
    fn name(&self) -> &'static str {
        "push_events"
    }

    async fn attempt(&self, username: &str) -> Option<u64> {
        let mut events = Vec::new();
        for page in 1..=MAX_EVENT_PAGES {
            match fetch_user_events(&self.client, username, page).await {
                Ok(batch) => {
                    let last_page = batch.len() < EVENTS_PER_PAGE;
                    events.extend(batch);
                    if last_page {
                        break;
                    }
                }
                Err(err) if page == 1 => {
                    warn!(username, error = %err, "public events unavailable");
                    return None;
                }
                Err(err) => {
                    debug!(username, page, error = %err, "stopping event pagination early");
                    break;
                }
            }
        }
        Some(count_recent_push_commits(&events, Utc::now()))
    }
}

/// The fallback chain in the order it is tried.
pub fn default_strategies(client: &GitHubClient) -> Vec<Box<dyn CommitCountStrategy>> {
    vec![
        Box::new(ContributionsApiStrategy::new(client.clone())),
        Box::new(CalendarScrapeStrategy::new(client.clone())),
        Box::new(PushEventsStrategy::new(client.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(kind: &str, created_at: DateTime<Utc>, size: u64) -> GitHubEvent {
        serde_json::from_value(serde_json::json!({
            "type": kind,
            "created_at": created_at.to_rfc3339(),
            "payload": { "size": size }
        }))
        .unwrap()
    }

    #[test]
    fn only_recent_pushes_count() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let events = [
            event("PushEvent", now - Duration::days(1), 3),
            event("PushEvent", now - Duration::days(364), 2),
            event("PushEvent", now - Duration::days(400), 50),
            event("CreateEvent", now - Duration::days(2), 9),
        ];
        assert_eq!(count_recent_push_commits(&events, now), 5);
        assert_eq!(count_recent_push_commits(&[], now), 0);
    }
}
