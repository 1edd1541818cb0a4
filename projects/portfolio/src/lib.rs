//! Portfolio site backend
//!
//! - Blog JSON store and its REST endpoints in `db/` and `endpoints/blogs/`
//! - RSS feed in `endpoints/feed/`, rendered by `utils/rss.rs`
//! - GitHub vanity stats in `endpoints/github/stats/`
//! - Configuration from env vars (and `.env`) in `config.rs`

pub mod config;
pub mod db;
pub mod endpoints;
pub mod routes;
pub mod utils;
