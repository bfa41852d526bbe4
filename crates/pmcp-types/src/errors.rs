//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider rejected a code or refresh-token exchange, or the
    /// exchange could not complete (network failure, malformed response).
    /// Carries the provider's error payload when one was returned.
    #[error("Token exchange failed: {message}")]
    Exchange {
        message: String,
        payload: Option<serde_json::Value>,
    },

    /// Reading or writing the persisted token record failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A Pinterest API call failed. Carries the provider's error payload
    /// when one was returned.
    #[error("Pinterest API error: {message}")]
    Api {
        message: String,
        payload: Option<serde_json::Value>,
    },

    /// The remote revoke call failed. Local sign-out still completes;
    /// callers log this rather than abort.
    #[error("Revocation failed: {0}")]
    Revocation(String),

    #[error("MCP error: {0}")]
    Mcp(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Construct an exchange error from a provider response body.
    ///
    /// The body is attached as structured payload when it parses as JSON,
    /// otherwise folded into the message.
    pub fn exchange(message: impl Into<String>, body: &str) -> Self {
        let message = message.into();
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(payload) => AppError::Exchange {
                message,
                payload: Some(payload),
            },
            Err(_) => AppError::Exchange {
                message: if body.is_empty() {
                    message
                } else {
                    format!("{}: {}", message, body)
                },
                payload: None,
            },
        }
    }

    /// Construct an API error from a provider response body.
    pub fn api(message: impl Into<String>, body: &str) -> Self {
        let message = message.into();
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(payload) => AppError::Api {
                message,
                payload: Some(payload),
            },
            Err(_) => AppError::Api {
                message: if body.is_empty() {
                    message
                } else {
                    format!("{}: {}", message, body)
                },
                payload: None,
            },
        }
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_error_attaches_json_payload() {
        let err = AppError::exchange("refresh rejected", r#"{"code":283,"message":"bad token"}"#);
        match err {
            AppError::Exchange { message, payload } => {
                assert_eq!(message, "refresh rejected");
                let payload = payload.unwrap();
                assert_eq!(payload["code"], 283);
            }
            other => panic!("expected Exchange error, got {:?}", other),
        }
    }

    #[test]
    fn test_exchange_error_with_non_json_body() {
        let err = AppError::exchange("refresh rejected", "Bad Gateway");
        match err {
            AppError::Exchange { message, payload } => {
                assert!(message.contains("Bad Gateway"));
                assert!(payload.is_none());
            }
            other => panic!("expected Exchange error, got {:?}", other),
        }
    }

    #[test]
    fn test_exchange_error_with_empty_body() {
        let err = AppError::exchange("connection reset", "");
        assert_eq!(err.to_string(), "Token exchange failed: connection reset");
    }
}
