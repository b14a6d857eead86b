//! Configuration module for the dashboard client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the dashboard backend
    pub api_url: String,
    /// File holding the persisted session identifier
    pub session_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Route every denied navigation is redirected to
    pub deny_redirect: String,
    /// Separate target for wrong-role denials, when set
    pub forbidden_redirect: Option<String>,
    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_url = env::var("DASHBOARD_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
            .trim_end_matches('/')
            .to_string();

        let session_path = env::var("DASHBOARD_SESSION_PATH")
            .unwrap_or_else(|_| "./data/session.json".to_string())
            .into();

        let log_level = env::var("DASHBOARD_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let deny_redirect =
            env::var("DASHBOARD_DENY_REDIRECT").unwrap_or_else(|_| "/auth".to_string());

        let forbidden_redirect = env::var("DASHBOARD_FORBIDDEN_REDIRECT")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let request_timeout = env::var("DASHBOARD_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| match s.parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!("Ignoring invalid DASHBOARD_REQUEST_TIMEOUT_SECS: {}", s);
                    None
                }
            });

        Self {
            api_url,
            session_path,
            log_level,
            deny_redirect,
            forbidden_redirect,
            request_timeout,
        }
    }
}
