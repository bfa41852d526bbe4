//! Token model and expiry policy

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Informational label written into the persisted record
pub const DEFAULT_TOKEN_NAME: &str = "Pinterest API Token";

/// An OAuth token pair as persisted on disk
///
/// One record exists at a time; a successful refresh supersedes the record
/// rather than mutating it. `expires_at` is epoch milliseconds; a token
/// without one is always treated as expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Opaque bearer credential
    pub access_token: String,

    /// Refresh credential, if the provider issued one
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Absolute expiry in epoch milliseconds
    #[serde(default)]
    pub expires_at: Option<i64>,

    /// Granted scopes; informational, not enforced locally
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Informational label
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_TOKEN_NAME.to_string()
}

impl Token {
    /// Whether this token must not be used and a refresh (or
    /// re-authorization) is required.
    ///
    /// A token without `expires_at` is always expired. Otherwise the token
    /// is expired once it is within `buffer_seconds` of its expiry, so a
    /// refresh happens before an API call can fail mid-flight.
    pub fn is_expired(&self, buffer_seconds: u64) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis(), buffer_seconds)
    }

    /// Expiry check against an explicit clock, for deterministic tests
    pub fn is_expired_at(&self, now_ms: i64, buffer_seconds: u64) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at < now_ms + (buffer_seconds as i64) * 1000,
        }
    }
}
