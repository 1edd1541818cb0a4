use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::db::{
    blog::{
        models::BlogPost,
        queries::{get_post_by_slug, GetPostBySlugError},
    },
    BlogStore,
};
use crate::endpoints::error_response;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("GetPostBySlug: {source}")]
    GetPostBySlug {
        #[from]
        source: GetPostBySlugError,
    },
    #[error("PostNotFound: {slug}")]
    PostNotFound { slug: String },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::GetPostBySlug { source } => {
                error!(error = %source, "failed to read blog post");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch blog")
            }
            HandlerError::PostNotFound { .. } => {
                error_response(StatusCode::NOT_FOUND, "Blog not found")
            }
        }
    }
}

/// Axum handler: GET /api/blogs/{slug}
pub async fn handler(
    Extension(store): Extension<BlogStore>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, HandlerError> {
    match get_post_by_slug(&store, &slug).await? {
        Some(post) => Ok(Json(post)),
        None => Err(HandlerError::PostNotFound { slug }),
    }
}
