//! OAuth token exchange, refresh, and revocation against the Pinterest
//! token endpoint

use crate::store::TokenStore;
use crate::token::{Token, DEFAULT_TOKEN_NAME};
use chrono::Utc;
use pmcp_config::AppConfig;
use pmcp_types::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info};

/// Upper bound on any single exchange call. The provider endpoint normally
/// answers in well under a second; a hung call must not block
/// `get_valid_token` indefinitely.
const EXCHANGE_TIMEOUT_SECS: u64 = 30;

/// Token response from the OAuth token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    /// Access token
    access_token: String,

    /// Expires in seconds
    #[serde(default)]
    expires_in: Option<i64>,

    /// Refresh token (optional)
    #[serde(default)]
    refresh_token: Option<String>,

    /// Granted scope (optional, comma- or space-separated)
    #[serde(default)]
    scope: Option<String>,
}

/// Client for the two token-minting operations and revocation
///
/// Both minting operations authenticate with HTTP Basic auth built from the
/// application id and secret, POST form-encoded bodies to
/// `{api_base_url}/oauth/token`, and persist the resulting token via the
/// injected store before returning it.
pub struct TokenExchanger {
    client: Client,
    config: AppConfig,
}

impl TokenExchanger {
    /// Create a new token exchanger
    ///
    /// Falls back to a default client if the bounded-timeout client cannot
    /// be constructed.
    pub fn new(config: AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(EXCHANGE_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client, config }
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/token", self.config.api_base_url)
    }

    /// Exchange an authorization code for a token
    ///
    /// Sends `grant_type=authorization_code` with the configured redirect
    /// URI. On success the token is persisted via `store` and returned.
    ///
    /// # Errors
    /// `AppError::Exchange` on HTTP failure or a malformed response, with
    /// the provider's error payload attached when present;
    /// `AppError::Storage` if the new token could not be persisted.
    pub async fn exchange_code(&self, code: &str, store: &dyn TokenStore) -> AppResult<Token> {
        info!("Exchanging authorization code for token");

        let mut params = HashMap::new();
        params.insert("grant_type".to_string(), "authorization_code".to_string());
        params.insert("code".to_string(), code.to_string());
        params.insert(
            "redirect_uri".to_string(),
            self.config.redirect_uri.clone(),
        );
        // Asks Pinterest to issue a refresh token alongside the access token.
        params.insert("continuous_refresh".to_string(), "true".to_string());

        let token = self.request_token(&params, "Token exchange").await?;
        store.write(&token).await?;

        info!("Token exchange successful");
        Ok(token)
    }

    /// Exchange a refresh token for a new token
    ///
    /// The new token is persisted before being returned; a refresh is not
    /// successful until durably recorded, since a crash immediately after
    /// must not lose the new token while discarding the consumed refresh
    /// token.
    ///
    /// If the provider omits `refresh_token` in its response the previous
    /// refresh token is NOT retained: the stored record then has no refresh
    /// capability until re-authorization. Known limitation.
    pub async fn refresh(&self, refresh_token: &str, store: &dyn TokenStore) -> AppResult<Token> {
        info!("Refreshing access token");

        let mut params = HashMap::new();
        params.insert("grant_type".to_string(), "refresh_token".to_string());
        params.insert("refresh_token".to_string(), refresh_token.to_string());

        let token = self.request_token(&params, "Token refresh").await?;
        store.write(&token).await?;

        info!("Token refresh successful");
        Ok(token)
    }

    /// Revoke a token server-side
    ///
    /// Does not touch the store; clearing local state on revocation is the
    /// orchestrator's responsibility.
    pub async fn revoke(&self, access_token: &str) -> AppResult<()> {
        info!("Revoking token");

        let response = self
            .client
            .post(format!("{}/oauth/token/revoke", self.config.api_base_url))
            .query(&[
                ("client_id", self.config.app_id.as_str()),
                ("client_secret", self.config.app_secret.as_str()),
                ("token", access_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Revocation(format!("Failed to send revoke request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Token revoke failed with status {}: {}", status, body);
            return Err(AppError::Revocation(format!(
                "Revoke failed with status {}: {}",
                status, body
            )));
        }

        debug!("Token revoked server-side");
        Ok(())
    }

    /// POST the given form to the token endpoint and build a [`Token`] from
    /// the response.
    async fn request_token(
        &self,
        params: &HashMap<String, String>,
        context: &str,
    ) -> AppResult<Token> {
        let response = self
            .client
            .post(self.token_url())
            .basic_auth(&self.config.app_id, Some(&self.config.app_secret))
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::Exchange {
                message: format!("{} request failed: {}", context, e),
                payload: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} failed with status {}: {}", context, status, body);
            return Err(AppError::exchange(
                format!("{} failed with status {}", context, status),
                &body,
            ));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            AppError::Exchange {
                message: format!("Failed to parse {} response: {}", context.to_lowercase(), e),
                payload: None,
            }
        })?;

        if token_response.access_token.is_empty() {
            return Err(AppError::Exchange {
                message: format!("{} response carried an empty access_token", context),
                payload: None,
            });
        }

        let expires_at = token_response
            .expires_in
            .map(|expires_in| Utc::now().timestamp_millis() + expires_in * 1000);

        Ok(Token {
            access_token: token_response.access_token,
            refresh_token: token_response.refresh_token,
            expires_at,
            scopes: split_scope(token_response.scope.as_deref()),
            name: DEFAULT_TOKEN_NAME.to_string(),
        })
    }
}

/// Split a provider scope string into individual scopes. Pinterest joins
/// scopes with commas; other providers use spaces, so both are accepted.
fn split_scope(scope: Option<&str>) -> Vec<String> {
    scope
        .map(|s| {
            s.split([',', ' '])
                .filter(|part| !part.is_empty())
                .map(|part| part.to_string())
                .collect()
        })
        .unwrap_or_default()
}
