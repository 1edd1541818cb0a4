use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// How log lines are rendered on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStyle {
    /// Coloured, with module targets; for a local terminal.
    Development,
    /// Plain single-line output for log collectors.
    Production,
}

#[derive(Debug, Error)]
pub enum TracingInitError {
    #[error("Invalid log filter '{directives}': {source}")]
    InvalidFilter {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to set global default subscriber: {source}")]
    SetGlobalDefault {
        #[from]
        source: tracing::subscriber::SetGlobalDefaultError,
    },
}

/// `RUST_LOG` when it parses, otherwise `fallback`.
pub fn build_filter(fallback: &str) -> Result<EnvFilter, TracingInitError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(fallback).map_err(|source| TracingInitError::InvalidFilter {
        directives: fallback.to_string(),
        source,
    })
}

/// Installs the process-wide subscriber. Call once, before the first log line.
pub fn tracing_init(fallback: &str, style: ConsoleStyle) -> Result<(), TracingInitError> {
    let filter = build_filter(fallback)?;
    let console = fmt::layer().compact();
    let console = match style {
        ConsoleStyle::Development => console.with_ansi(true).with_target(true),
        ConsoleStyle::Production => console.with_ansi(false).with_target(false),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(console);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_fallback_names_the_directives() {
        // RUST_LOG takes precedence when the environment provides a valid one
        if std::env::var("RUST_LOG").is_err() {
            match build_filter("info,portfolio=verbose").unwrap_err() {
                TracingInitError::InvalidFilter { directives, .. } => {
                    assert_eq!(directives, "info,portfolio=verbose")
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn valid_fallback_builds() {
        assert!(build_filter("warn,projects_portfolio=debug").is_ok());
    }
}
