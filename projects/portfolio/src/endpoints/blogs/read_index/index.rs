use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use crate::db::{
    blog::{
        models::BlogIndexEntry,
        queries::{list_posts, ListPostsError},
    },
    BlogStore,
};
use crate::endpoints::error_response;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidQuery: {source}")]
    InvalidQuery {
        #[from]
        source: QueryRejection,
    },
    #[error("ListPosts: {source}")]
    ListPosts {
        #[from]
        source: ListPostsError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::InvalidQuery { source } => error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid blog filters: {}", source.body_text()),
            ),
            HandlerError::ListPosts { source } => {
                error!(error = %source, "failed to read blog index");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blogs")
            }
        }
    }
}

/// Optional listing filters; none means the whole index.
#[derive(Debug, Default, Deserialize)]
pub struct BlogIndexQuery {
    category: Option<String>,
    featured: Option<bool>,
}

impl BlogIndexQuery {
    fn matches(&self, entry: &BlogIndexEntry) -> bool {
        self.category
            .as_deref()
            .map_or(true, |category| entry.category == category)
            && self.featured.map_or(true, |featured| entry.featured == featured)
    }
}

#[derive(Debug, Serialize)]
pub struct BlogIndexResponse {
    posts: Vec<BlogIndexEntry>,
}

/// Axum handler: GET /api/blogs
pub async fn handler(
    Extension(store): Extension<BlogStore>,
    query: Result<Query<BlogIndexQuery>, QueryRejection>,
) -> Result<Json<BlogIndexResponse>, HandlerError> {
    let Query(query) = query?;
    let posts = list_posts(&store)
        .await?
        .into_iter()
        .filter(|entry| query.matches(entry))
        .collect();

    Ok(Json(BlogIndexResponse { posts }))
}
