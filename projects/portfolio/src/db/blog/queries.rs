use std::io::ErrorKind;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

use crate::config::WriteMode;
use crate::db::{blog::models::*, BlogStore, INDEX_FILE_NAME};
use crate::utils::blog_text::{
    estimate_read_time, generate_blog_id, is_url_safe_slug, DEFAULT_WORDS_PER_MINUTE,
};

/// `index` would alias the index file itself.
fn is_storable_slug(slug: &str) -> bool {
    is_url_safe_slug(slug) && format!("{slug}.json") != INDEX_FILE_NAME
}

#[derive(Debug, Error)]
pub enum ReadIndexError {
    #[error("ReadIndexFile: {source}")]
    ReadIndexFile { source: std::io::Error },

    #[error("ParseIndexFile: {source}")]
    ParseIndexFile { source: serde_json::Error },
}

/// Loads `index.json`; a missing file is an empty index.
pub async fn read_index(store: &BlogStore) -> Result<BlogIndex, ReadIndexError> {
    let bytes = match fs::read(store.index_path()).await {
        Ok(bytes) => bytes,
        Err(source) if source.kind() == ErrorKind::NotFound => {
            debug!(path = %store.index_path().display(), "blog index missing, treating as empty");
            return Ok(BlogIndex::default());
        }
        Err(source) => return Err(ReadIndexError::ReadIndexFile { source }),
    };

    serde_json::from_slice(&bytes).map_err(|source| ReadIndexError::ParseIndexFile { source })
}

#[derive(Debug, Error)]
pub enum ListPostsError {
    #[error(transparent)]
    ReadIndex {
        #[from]
        source: ReadIndexError,
    },
}

/// Every index entry, newest first.
pub async fn list_posts(store: &BlogStore) -> Result<Vec<BlogIndexEntry>, ListPostsError> {
    Ok(read_index(store).await?.posts)
}

#[derive(Debug, Error)]
pub enum GetPostBySlugError {
    #[error("ReadPostFile: {source}")]
    ReadPostFile { source: std::io::Error },

    #[error("ParsePostFile: {slug}: {source}")]
    ParsePostFile {
        slug: String,
        source: serde_json::Error,
    },
}

/// The full post stored under `slug`, or `None` if there is no such post.
pub async fn get_post_by_slug(
    store: &BlogStore,
    slug: &str,
) -> Result<Option<BlogPost>, GetPostBySlugError> {
    if !is_storable_slug(slug) {
        return Ok(None);
    }

    let bytes = match fs::read(store.post_path(slug)).await {
        Ok(bytes) => bytes,
        Err(source) if source.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(GetPostBySlugError::ReadPostFile { source }),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| GetPostBySlugError::ParsePostFile {
            slug: slug.to_string(),
            source,
        })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidatePostError {
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Invalid slug '{slug}': use lowercase letters, digits and single hyphens")]
    InvalidSlug { slug: String },
}

/// Title, slug and content must be non-blank, and the slug must be storable.
pub fn validate_post(post: &BlogPost) -> Result<(), ValidatePostError> {
    let fields: Vec<&'static str> = [
        ("title", post.meta.title.as_str()),
        ("slug", post.meta.slug.as_str()),
        ("content", post.content.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();

    if !fields.is_empty() {
        return Err(ValidatePostError::MissingFields { fields });
    }

    if !is_storable_slug(&post.meta.slug) {
        return Err(ValidatePostError::InvalidSlug {
            slug: post.meta.slug.clone(),
        });
    }

    Ok(())
}

/// Fills the fields the authoring form may leave blank.
pub fn normalize_draft(mut post: BlogPost, now: DateTime<Utc>) -> BlogPost {
    if post.meta.read_time.trim().is_empty() {
        post.meta.read_time = estimate_read_time(&post.content, DEFAULT_WORDS_PER_MINUTE);
    }
    if post.meta.id.trim().is_empty() {
        post.meta.id = generate_blog_id(now);
    }
    post
}

#[derive(Debug, Error)]
pub enum UpsertPostError {
    #[error("ValidatePost: {source}")]
    ValidatePost {
        #[from]
        source: ValidatePostError,
    },

    #[error("Blog with slug '{slug}' already exists")]
    SlugConflict { slug: String },

    #[error("CheckPostFile: {source}")]
    CheckPostFile { source: std::io::Error },

    #[error(transparent)]
    ReadIndex {
        #[from]
        source: ReadIndexError,
    },

    #[error("SerializeJson: {source}")]
    SerializeJson {
        #[from]
        source: serde_json::Error,
    },

    #[error("CreateDataDir: {source}")]
    CreateDataDir { source: std::io::Error },

    #[error("WritePostFile: {source}")]
    WritePostFile { source: std::io::Error },

    #[error("WriteIndexFile: {source}")]
    WriteIndexFile { source: std::io::Error },
}

/// Saves `draft` to `<slug>.json` and mirrors its metadata into the index.
///
/// New slugs are prepended to the index, existing ones are replaced where
/// they stand. In `WriteMode::CreateOnly` an existing slug is a conflict.
/// Nothing is written when validation fails.
pub async fn upsert_post(
    store: &BlogStore,
    draft: BlogPost,
    now: DateTime<Utc>,
) -> Result<SavedPost, UpsertPostError> {
    let post = normalize_draft(draft, now);
    validate_post(&post)?;

    let slug = post.meta.slug.clone();
    let post_path = store.post_path(&slug);
    let exists = fs::try_exists(&post_path)
        .await
        .map_err(|source| UpsertPostError::CheckPostFile { source })?;

    if exists && store.write_mode() == WriteMode::CreateOnly {
        return Err(UpsertPostError::SlugConflict { slug });
    }

    let mut index = read_index(store).await?;
    let entry = post.index_entry();
    let outcome = if exists {
        UpsertOutcome::Updated
    } else {
        UpsertOutcome::Created
    };
    // an index entry whose post file went missing is replaced too, keeping slugs unique
    match index.posts.iter_mut().find(|existing| existing.slug == slug) {
        Some(existing) => *existing = entry,
        None => index.posts.insert(0, entry),
    }

    let post_json = serde_json::to_vec_pretty(&post)?;
    let index_json = serde_json::to_vec_pretty(&index)?;

    fs::create_dir_all(store.root())
        .await
        .map_err(|source| UpsertPostError::CreateDataDir { source })?;
    fs::write(&post_path, post_json)
        .await
        .map_err(|source| UpsertPostError::WritePostFile { source })?;
    fs::write(store.index_path(), index_json)
        .await
        .map_err(|source| UpsertPostError::WriteIndexFile { source })?;

    info!(slug = %slug, update = outcome.is_update(), "blog post saved");
    Ok(SavedPost { slug, outcome })
}
