//! Pinterest v5 REST API client
//!
//! Thin passthrough over the endpoints the MCP tools expose. Responses are
//! returned as raw JSON values; the tool layer serializes them straight
//! back to the agent, so no response models are maintained here.

use pmcp_types::{AppError, AppResult};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Default page size for list endpoints
const DEFAULT_PAGE_SIZE: u32 = 25;

/// Pinterest REST API client
///
/// Stateless apart from the connection pool. The caller supplies a bearer
/// access token per call; this client never caches one, since a token may
/// be superseded between requests.
pub struct PinterestClient {
    http: Client,
    base_url: String,
}

impl PinterestClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// GET `/user_account` — the authenticated user's profile
    pub async fn get_user_info(&self, access_token: &str) -> AppResult<Value> {
        self.get(access_token, "/user_account", &[]).await
    }

    /// GET `/boards` — the authenticated user's boards
    pub async fn list_boards(
        &self,
        access_token: &str,
        page_size: Option<u32>,
        bookmark: Option<&str>,
    ) -> AppResult<Value> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string();
        self.get(
            access_token,
            "/boards",
            &[
                ("page_size", page_size.as_str()),
                ("bookmark", bookmark.unwrap_or("")),
            ],
        )
        .await
    }

    /// POST `/boards` — create a board
    pub async fn create_board(&self, access_token: &str, board: &Value) -> AppResult<Value> {
        self.post(access_token, "/boards", board).await
    }

    /// GET `/boards/{id}` — board details
    pub async fn get_board(&self, access_token: &str, board_id: &str) -> AppResult<Value> {
        self.get(access_token, &format!("/boards/{}", board_id), &[])
            .await
    }

    /// GET `/boards/{id}/pins` — pins on a board
    pub async fn list_pins(
        &self,
        access_token: &str,
        board_id: &str,
        page_size: Option<u32>,
        bookmark: Option<&str>,
    ) -> AppResult<Value> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string();
        self.get(
            access_token,
            &format!("/boards/{}/pins", board_id),
            &[
                ("page_size", page_size.as_str()),
                ("bookmark", bookmark.unwrap_or("")),
            ],
        )
        .await
    }

    /// POST `/pins` — create a pin
    pub async fn create_pin(&self, access_token: &str, pin: &Value) -> AppResult<Value> {
        self.post(access_token, "/pins", pin).await
    }

    /// GET `/pins/{id}` — pin details
    pub async fn get_pin(&self, access_token: &str, pin_id: &str) -> AppResult<Value> {
        self.get(access_token, &format!("/pins/{}", pin_id), &[])
            .await
    }

    async fn get(
        &self,
        access_token: &str,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> AppResult<Value> {
        debug!("GET {}{}", self.base_url, endpoint);

        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::Api {
                message: format!("GET {} failed: {}", endpoint, e),
                payload: None,
            })?;

        Self::into_json(endpoint, response).await
    }

    async fn post(&self, access_token: &str, endpoint: &str, body: &Value) -> AppResult<Value> {
        debug!("POST {}{}", self.base_url, endpoint);

        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Api {
                message: format!("POST {} failed: {}", endpoint, e),
                payload: None,
            })?;

        Self::into_json(endpoint, response).await
    }

    async fn into_json(endpoint: &str, response: reqwest::Response) -> AppResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::api(
                format!("{} returned status {}", endpoint, status),
                &body,
            ));
        }

        response.json().await.map_err(|e| AppError::Api {
            message: format!("Failed to parse {} response: {}", endpoint, e),
            payload: None,
        })
    }
}
