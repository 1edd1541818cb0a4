use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use interfaces_github_stats::client::{
    GitHubEndpoints, DEFAULT_API_BASE, DEFAULT_CONTRIBUTIONS_BASE, DEFAULT_USER_AGENT,
    DEFAULT_WEB_BASE,
};
use thiserror::Error;

/// Deployment flavour. Authoring and raw blog APIs only exist in development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = LoadConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(LoadConfigError::InvalidValue {
                key: "APP_ENV",
                value: other.to_string(),
            }),
        }
    }
}

/// How the blog writer treats a slug that already has a post file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Upsert,
    CreateOnly,
}

impl FromStr for WriteMode {
    type Err = LoadConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "upsert" => Ok(WriteMode::Upsert),
            "create-only" | "create_only" => Ok(WriteMode::CreateOnly),
            other => Err(LoadConfigError::InvalidValue {
                key: "BLOG_WRITE_MODE",
                value: other.to_string(),
            }),
        }
    }
}

/// Public identity of the site, used by the feed.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub url: String,
    pub owner_name: String,
    pub owner_bio: String,
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub endpoints: GitHubEndpoints,
    pub token: Option<String>,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub bind_addr: SocketAddr,
    pub blog_data_dir: PathBuf,
    pub write_mode: WriteMode,
    pub site: SiteConfig,
    pub github: GitHubConfig,
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("InvalidValue: {key}={value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("InvalidBindAddr: {source}")]
    InvalidBindAddr {
        #[from]
        source: std::net::AddrParseError,
    },
}

impl AppConfig {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, LoadConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoadConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let environment = match get("APP_ENV") {
            Some(value) => value.parse()?,
            None => Environment::Production,
        };
        let write_mode = match get("BLOG_WRITE_MODE") {
            Some(value) => value.parse()?,
            None => WriteMode::default(),
        };
        let bind_addr: SocketAddr = get_or("BIND_ADDR", "0.0.0.0:8000").trim().parse()?;

        Ok(Self {
            environment,
            bind_addr,
            blog_data_dir: PathBuf::from(get_or("BLOG_DATA_DIR", "data/content/blogs")),
            write_mode,
            site: SiteConfig {
                url: get_or("SITE_URL", "http://localhost:8000")
                    .trim_end_matches('/')
                    .to_string(),
                owner_name: get_or("SITE_OWNER_NAME", "Portfolio"),
                owner_bio: get("SITE_OWNER_BIO").unwrap_or_default(),
            },
            github: GitHubConfig {
                endpoints: GitHubEndpoints {
                    api_base: get_or("GITHUB_API_BASE", DEFAULT_API_BASE),
                    web_base: get_or("GITHUB_WEB_BASE", DEFAULT_WEB_BASE),
                    contributions_base: get_or(
                        "GITHUB_CONTRIBUTIONS_API_BASE",
                        DEFAULT_CONTRIBUTIONS_BASE,
                    ),
                },
                token: get("GITHUB_TOKEN"),
                user_agent: get_or("GITHUB_USER_AGENT", DEFAULT_USER_AGENT),
            },
            log_level: get_or("LOG_LEVEL", "info"),
        })
    }
}
