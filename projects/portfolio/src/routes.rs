use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Extension, Router,
};
use interfaces_github_stats::GitHubClient;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, Environment};
use crate::db::BlogStore;
use crate::endpoints::{
    blogs::{read_index, read_post, save},
    error_response, feed,
    github::stats::{self, aggregate::GitHubStatsAggregator},
};

/// Rejects requests to development-only routes outside development.
pub async fn environment_gate(
    State(environment): State<Environment>,
    req: Request,
    next: Next,
) -> Response {
    if environment != Environment::Development {
        return error_response(StatusCode::FORBIDDEN, "Not available in production");
    }
    next.run(req).await
}

/// The full HTTP surface, wired from `config`.
pub fn build_router(config: &AppConfig) -> Router {
    let store = BlogStore::new(&config.blog_data_dir, config.write_mode);
    let github = GitHubClient::new(
        reqwest::Client::new(),
        config.github.endpoints.clone(),
        config.github.token.clone(),
        config.github.user_agent.clone(),
    );
    let aggregator = Arc::new(GitHubStatsAggregator::new(github));

    let authoring = Router::new()
        .route("/api/blogs", get(read_index::index::handler))
        .route("/api/blogs/{slug}", get(read_post::index::handler))
        .route("/api/save-blog", post(save::index::handler))
        .route_layer(middleware::from_fn_with_state(
            config.environment,
            environment_gate,
        ));

    Router::new()
        .route("/api/github-stats", get(stats::index::handler))
        .route("/feed.xml", get(feed::index::handler))
        .merge(authoring)
        .layer(Extension(store))
        .layer(Extension(config.site.clone()))
        .layer(Extension(aggregator))
        .layer(TraceLayer::new_for_http())
}
