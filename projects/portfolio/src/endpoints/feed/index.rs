use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::config::SiteConfig;
use crate::db::{
    blog::queries::{list_posts, ListPostsError},
    BlogStore,
};
use crate::endpoints::error_response;
use crate::utils::rss::render_feed;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("ListPosts: {source}")]
    ListPosts {
        #[from]
        source: ListPostsError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::ListPosts { source } => {
                error!(error = %source, "failed to build feed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate feed")
            }
        }
    }
}

/// Axum handler: GET /feed.xml
pub async fn handler(
    Extension(store): Extension<BlogStore>,
    Extension(site): Extension<SiteConfig>,
) -> Result<Response, HandlerError> {
    let posts = list_posts(&store).await?;
    let xml = render_feed(&site, &posts);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/xml"),
            (header::CACHE_CONTROL, "public, max-age=3600, s-maxage=3600"),
        ],
        xml,
    )
        .into_response())
}
