//! Configuration management module
//!
//! Builds the application configuration from environment variables and
//! resolves OS-specific paths for the persisted token record. All settings
//! are collected into an explicit [`AppConfig`] that is passed into
//! constructors; nothing reads the environment after startup.

pub mod paths;

use pmcp_types::{AppError, AppResult};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Default Pinterest REST API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://api.pinterest.com/v5";

/// Default authorization redirect base (the user-facing consent page)
pub const DEFAULT_AUTHORIZE_URL: &str = "https://www.pinterest.com/oauth/";

/// Default OAuth redirect URI; the `auth` flow listens on this port
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8085/";

/// Default early-refresh margin in seconds.
///
/// A token within this many seconds of its expiry is treated as expired so
/// a refresh happens before an API call can fail mid-flight. The upstream
/// implementation shipped with a 3052-second buffer (numerically equal to
/// its callback port), which forced a refresh on nearly every call; that
/// value is treated as a misconfiguration, not a contract.
pub const DEFAULT_REFRESH_BUFFER_SECS: u64 = 300;

/// Scopes requested during authorization
pub const DEFAULT_SCOPES: &[&str] = &[
    "boards:read",
    "boards:write",
    "pins:read",
    "pins:write",
    "user_accounts:read",
];

/// Application configuration
///
/// Everything the OAuth layer and API client need, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pinterest application ID
    pub app_id: String,

    /// Pinterest application secret
    pub app_secret: String,

    /// OAuth redirect URI registered with the application
    pub redirect_uri: String,

    /// Pinterest REST API base URL
    pub api_base_url: String,

    /// Authorization consent page base URL
    pub authorize_url: String,

    /// Path of the persisted token record
    pub token_path: PathBuf,

    /// Seconds before expiry at which a token is considered expired
    pub refresh_buffer_seconds: u64,

    /// Scopes requested during authorization
    pub scopes: Vec<String>,
}

impl AppConfig {
    /// Build configuration from environment variables
    ///
    /// Required: `PINTEREST_APP_ID`, `PINTEREST_APP_SECRET`.
    ///
    /// Optional overrides: `REDIRECT_URI`, `PINTEREST_API_URL`,
    /// `PINTEREST_TOKEN_PATH`, `PINTEREST_REFRESH_BUFFER` (seconds).
    ///
    /// # Errors
    /// Returns `AppError::Config` if a required variable is missing or empty.
    pub fn from_env() -> AppResult<Self> {
        let app_id = required_env("PINTEREST_APP_ID")?;
        let app_secret = required_env("PINTEREST_APP_SECRET")?;

        let redirect_uri =
            std::env::var("REDIRECT_URI").unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());
        let api_base_url = std::env::var("PINTEREST_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let token_path = match std::env::var("PINTEREST_TOKEN_PATH") {
            Ok(path) => PathBuf::from(path),
            Err(_) => paths::token_file()?,
        };

        let refresh_buffer_seconds = match std::env::var("PINTEREST_REFRESH_BUFFER") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    "Invalid PINTEREST_REFRESH_BUFFER '{}', using default of {} seconds",
                    raw, DEFAULT_REFRESH_BUFFER_SECS
                );
                DEFAULT_REFRESH_BUFFER_SECS
            }),
            Err(_) => DEFAULT_REFRESH_BUFFER_SECS,
        };

        debug!(
            "Configuration loaded (api: {}, token path: {})",
            api_base_url,
            token_path.display()
        );

        Ok(Self {
            app_id,
            app_secret,
            redirect_uri,
            api_base_url,
            authorize_url: DEFAULT_AUTHORIZE_URL.to_string(),
            token_path,
            refresh_buffer_seconds,
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Port the auth callback server should listen on, parsed from the
    /// redirect URI. Falls back to 8085 if the URI carries no explicit port.
    pub fn callback_port(&self) -> u16 {
        self.redirect_uri
            .split("://")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .and_then(|authority| authority.rsplit_once(':'))
            .and_then(|(_, port)| port.parse().ok())
            .unwrap_or(8085)
    }
}

fn required_env(name: &str) -> AppResult<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Config(format!(
            "Missing required environment variable: {}",
            name
        ))),
    }
}
