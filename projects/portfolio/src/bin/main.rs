use axum::serve;
use projects_portfolio::{
    config::{AppConfig, Environment, LoadConfigError},
    routes::build_router,
};
use thiserror::Error;
use tracing::{info, warn};
use utils_trace::{tracing_init, ConsoleStyle};

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadConfig: {source}")]
    LoadConfig {
        #[source]
        source: LoadConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let dotenv = dotenvy::dotenv();
    let config = AppConfig::from_env().map_err(|source| MainError::LoadConfig { source })?;

    let style = match config.environment {
        Environment::Development => ConsoleStyle::Development,
        Environment::Production => ConsoleStyle::Production,
    };
    tracing_init(&config.log_level, style)
        .map_err(|source| MainError::TracingInit { source })?;
    if let Err(err) = dotenv {
        if !err.not_found() {
            warn!(error = %err, "ignoring unreadable .env file");
        }
    }

    let app = build_router(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!(
        addr = %config.bind_addr,
        environment = ?config.environment,
        data_dir = %config.blog_data_dir.display(),
        "Server running"
    );

    serve(listener, app)
        .await
        .map_err(|source| MainError::Serve { source })?;

    Ok(())
}
