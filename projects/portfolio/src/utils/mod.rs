pub mod blog_text;
pub mod rss;
