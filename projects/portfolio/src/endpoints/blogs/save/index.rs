use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::{
    blog::{
        models::BlogPost,
        queries::{upsert_post, UpsertPostError},
    },
    BlogStore,
};
use crate::endpoints::error_response;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("InvalidBody: {source}")]
    InvalidBody {
        #[from]
        source: JsonRejection,
    },
    #[error("UpsertPost: {source}")]
    UpsertPost {
        #[from]
        source: UpsertPostError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        match self {
            HandlerError::InvalidBody { source } => error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid blog post body: {}", source.body_text()),
            ),
            HandlerError::UpsertPost {
                source: UpsertPostError::ValidatePost { source },
            } => error_response(StatusCode::BAD_REQUEST, source.to_string()),
            HandlerError::UpsertPost {
                source: source @ UpsertPostError::SlugConflict { .. },
            } => {
                warn!(error = %source, "refusing to overwrite blog post");
                error_response(StatusCode::CONFLICT, "Blog with this slug already exists")
            }
            HandlerError::UpsertPost { source } => {
                error!(error = %source, "failed to save blog post");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save blog post")
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlogResponse {
    success: bool,
    message: &'static str,
    slug: String,
    is_update: bool,
}

/// Axum handler: POST /api/save-blog
pub async fn handler(
    Extension(store): Extension<BlogStore>,
    payload: Result<Json<BlogPost>, JsonRejection>,
) -> Result<Json<SaveBlogResponse>, HandlerError> {
    let Json(draft) = payload?;
    let saved = upsert_post(&store, draft, Utc::now()).await?;

    let is_update = saved.outcome.is_update();
    Ok(Json(SaveBlogResponse {
        success: true,
        message: if is_update {
            "Blog post updated successfully"
        } else {
            "Blog post saved successfully"
        },
        slug: saved.slug,
        is_update,
    }))
}
