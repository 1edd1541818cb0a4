//! Thin clients for the public GitHub surfaces the stats endpoint reads:
//!
//! - REST API (`/users/{name}/repos`, `/users/{name}/events/public`)
//! - the HTML contribution calendar on github.com
//! - the third-party contributions aggregation API
//!
//! Nothing here retries or caches. Callers decide how to degrade.

pub mod calendar;
pub mod client;
pub mod contributions;
pub mod events;
pub mod repos;

pub use client::{GitHubClient, GitHubEndpoints, GitHubRequestError};
