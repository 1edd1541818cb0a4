use chrono::{DateTime, Utc};

pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Lowercases `text` and collapses every run of non `[a-z0-9]` characters into one `-`.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// A slug is safe to use as a file name and URL segment when slugifying it is a no-op.
pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && generate_slug(slug) == slug
}

/// "N min read", rounding up.
pub fn estimate_read_time(text: &str, words_per_minute: usize) -> String {
    let words = text.split_whitespace().count();
    let minutes = words.div_ceil(words_per_minute.max(1));
    format!("{minutes} min read")
}

pub fn generate_blog_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}
