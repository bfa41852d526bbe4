//! Token lifecycle orchestrator
//!
//! Single entry point the tool-execution layer calls before every outbound
//! API request. Every call re-derives state from the store; nothing is
//! cached across calls.

use crate::exchange::TokenExchanger;
use crate::store::TokenStore;
use crate::token::Token;
use pmcp_types::AppResult;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Token lifecycle orchestrator
///
/// Ties the store, expiry policy, and exchange client together. Per call
/// the stored record is in one of four states:
///
/// | state                  | result                    |
/// |------------------------|---------------------------|
/// | no token               | `Ok(None)`                |
/// | valid                  | `Ok(Some(token))`         |
/// | expired, refreshable   | `Ok(Some(new))` or `Err`  |
/// | expired, unrefreshable | `Ok(None)`                |
///
/// `Ok(None)` means "authentication required" and the caller must answer
/// its invoker with a re-authorization instruction, never crash.
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    exchanger: TokenExchanger,
    buffer_seconds: u64,

    /// Serializes refresh exchanges so concurrent callers hitting an
    /// expired token trigger one network call, not one each.
    refresh_lock: Mutex<()>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>, exchanger: TokenExchanger, buffer_seconds: u64) -> Self {
        Self {
            store,
            exchanger,
            buffer_seconds,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Get a token that is valid for immediate use, refreshing if needed
    ///
    /// # Errors
    /// `AppError::Exchange` when an expired token's refresh is rejected or
    /// the exchange could not complete; the store keeps the stale token in
    /// that case. `AppError::Storage` when the refreshed token could not be
    /// persisted. A missing or unrefreshable token is `Ok(None)`, not an
    /// error: never having authenticated differs from a transient failure.
    pub async fn get_valid_token(&self) -> AppResult<Option<Token>> {
        // Fast path: a valid token needs no lock and no network.
        match self.store.read().await? {
            None => {
                debug!("No token stored, authentication required");
                return Ok(None);
            }
            Some(token) if !token.is_expired(self.buffer_seconds) => {
                return Ok(Some(token));
            }
            Some(_) => {}
        }

        let _guard = self.refresh_lock.lock().await;

        // Re-derive under the lock: a caller that held it before us may
        // have refreshed (or revoked) while we waited.
        let Some(token) = self.store.read().await? else {
            return Ok(None);
        };
        if !token.is_expired(self.buffer_seconds) {
            debug!("Token refreshed by a concurrent caller, reusing it");
            return Ok(Some(token));
        }

        let Some(refresh_token) = token.refresh_token.as_deref() else {
            info!("Token expired with no refresh token, re-authorization required");
            return Ok(None);
        };

        info!("Access token expired, refreshing");
        let new_token = self.exchanger.refresh(refresh_token, self.store.as_ref()).await?;
        Ok(Some(new_token))
    }

    /// Revoke the current token and clear local state
    ///
    /// Returns `Ok(false)` if no token is stored (no remote call made).
    /// The store is cleared even when the remote revoke fails, so local
    /// state never claims an authentication the user intended to end.
    pub async fn revoke_current(&self) -> AppResult<bool> {
        let Some(token) = self.store.read().await? else {
            debug!("No token to revoke");
            return Ok(false);
        };

        if let Err(e) = self.exchanger.revoke(&token.access_token).await {
            warn!("Remote revoke failed, clearing local state anyway: {}", e);
        }

        self.store.clear().await?;
        info!("Local token record cleared");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;
    use crate::token::DEFAULT_TOKEN_NAME;
    use chrono::Utc;
    use pmcp_config::AppConfig;
    use std::path::PathBuf;

    fn test_config() -> AppConfig {
        AppConfig {
            app_id: "app".to_string(),
            app_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8085/".to_string(),
            // Unroutable; these tests must not reach the network.
            api_base_url: "http://127.0.0.1:1/v5".to_string(),
            authorize_url: "https://www.pinterest.com/oauth/".to_string(),
            token_path: PathBuf::from("/tmp/unused.json"),
            refresh_buffer_seconds: 60,
            scopes: vec![],
        }
    }

    fn manager_with(store: Arc<dyn TokenStore>) -> TokenManager {
        TokenManager::new(store, TokenExchanger::new(test_config()), 60)
    }

    fn token(expires_offset_ms: i64, refresh: Option<&str>) -> Token {
        Token {
            access_token: "X".to_string(),
            refresh_token: refresh.map(|r| r.to_string()),
            expires_at: Some(Utc::now().timestamp_millis() + expires_offset_ms),
            scopes: vec![],
            name: DEFAULT_TOKEN_NAME.to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_returns_none() {
        let manager = manager_with(Arc::new(MemoryTokenStore::new()));
        assert!(manager.get_valid_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_valid_token_returned_unchanged() {
        let stored = token(3_600_000, Some("R"));
        let manager = manager_with(Arc::new(MemoryTokenStore::with_token(stored.clone())));

        let result = manager.get_valid_token().await.unwrap().unwrap();
        assert_eq!(result, stored);
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_returns_none() {
        // No refresh token: must return None without attempting a network
        // call (the configured endpoint is unroutable and would error).
        let manager = manager_with(Arc::new(MemoryTokenStore::with_token(token(-1_000, None))));
        assert!(manager.get_valid_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_with_empty_store_is_noop() {
        let manager = manager_with(Arc::new(MemoryTokenStore::new()));
        assert!(!manager.revoke_current().await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_clears_store_despite_remote_failure() {
        // Remote revoke hits the unroutable endpoint and fails; local state
        // must be cleared regardless.
        let store = Arc::new(MemoryTokenStore::with_token(token(3_600_000, Some("R"))));
        let manager = manager_with(store.clone());

        assert!(manager.revoke_current().await.unwrap());
        assert!(store.read().await.unwrap().is_none());

        // Second call: nothing left to revoke.
        assert!(!manager.revoke_current().await.unwrap());
    }
}
