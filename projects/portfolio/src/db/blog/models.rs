use serde::{Deserialize, Serialize};

/// Listing metadata for one post, as stored in `index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogIndexEntry {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub cover_image: String,
    pub published_at: String,
    pub read_time: String,
    pub category: String,
    pub tags: Vec<String>,
    pub author: String,
    pub featured: bool,
}

/// A full post: the index metadata plus the markdown body, stored in `<slug>.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(flatten)]
    pub meta: BlogIndexEntry,
    #[serde(default)]
    pub content: String,
}

impl BlogPost {
    /// Metadata projection written to the index.
    pub fn index_entry(&self) -> BlogIndexEntry {
        self.meta.clone()
    }
}

/// On-disk shape of `index.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogIndex {
    #[serde(default)]
    pub posts: Vec<BlogIndexEntry>,
}

/// Whether an upsert created a new post or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

impl UpsertOutcome {
    pub fn is_update(self) -> bool {
        matches!(self, UpsertOutcome::Updated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedPost {
    pub slug: String,
    pub outcome: UpsertOutcome,
}
