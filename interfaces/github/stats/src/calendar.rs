use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;

use crate::client::{user_segment, GitHubClient, GitHubRequestError, Upstream};

lazy_static! {
    static ref DAY_CELL: Selector = Selector::parse("[data-count]").expect("valid selector");
    static ref YEARLY_TOTAL: Regex =
        Regex::new(r"(?i)([0-9][0-9,]*)\s+contributions?\s+in\s+the\s+last\s+year")
            .expect("valid regex");
}

#[derive(Debug, Error)]
pub enum FetchContributionCalendarError {
    #[error("FetchContributionCalendar: {source}")]
    Request {
        #[from]
        source: GitHubRequestError,
    },
}

/// Raw HTML of the public contribution calendar fragment.
pub async fn fetch_contribution_calendar(
    client: &GitHubClient,
    username: &str,
) -> Result<String, FetchContributionCalendarError> {
    let path = format!("/users/{}/contributions", user_segment(username));
    Ok(client.get_text(Upstream::Web, &path, &[]).await?)
}

/// Reads a last-year contribution count out of calendar markup.
///
/// Day cells carrying `data-count` are summed first. When there are none,
/// or they add up to zero, the "N contributions in the last year" heading is
/// used instead. `None` means neither shape was recognised.
pub fn parse_contribution_count(html: &str) -> Option<u64> {
    let document = Html::parse_document(html);
    let from_cells: u64 = document
        .select(&DAY_CELL)
        .filter_map(|cell| cell.value().attr("data-count"))
        .filter_map(|count| count.trim().parse::<u64>().ok())
        .sum();
    if from_cells > 0 {
        return Some(from_cells);
    }

    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    YEARLY_TOTAL
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|total| total.as_str().replace(',', "").parse::<u64>().ok())
}
