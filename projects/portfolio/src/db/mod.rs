pub mod blog;

use std::path::{Path, PathBuf};

use crate::config::WriteMode;

pub const INDEX_FILE_NAME: &str = "index.json";

/// Flat-file blog repository: `index.json` plus one `<slug>.json` per post.
///
/// Writes are two independent file replacements (post, then index) with no
/// lock and no atomic rename. A crash between them leaves the index stale, and
/// two concurrent writers race with last-writer-wins on the index. Only a
/// single local author is expected.
#[derive(Debug, Clone)]
pub struct BlogStore {
    root: PathBuf,
    write_mode: WriteMode,
}

impl BlogStore {
    pub fn new(root: impl Into<PathBuf>, write_mode: WriteMode) -> Self {
        Self {
            root: root.into(),
            write_mode,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE_NAME)
    }

    /// Callers must have checked the slug with `is_url_safe_slug`.
    pub fn post_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.json"))
    }
}
