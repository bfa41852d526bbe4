//! Tool execution dispatch
//!
//! Every tool call asks the token manager for a valid bearer token first.
//! An absent token is answered with an authentication-required error the
//! agent can relay to the user, never a crash.

use pmcp_api::PinterestClient;
use pmcp_oauth::TokenManager;
use pmcp_types::{AppError, AppResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Instruction relayed to the agent when no usable token exists
pub const AUTH_REQUIRED: &str =
    "Not authenticated. Run `pinterest-mcp auth` to authorize with Pinterest, then retry.";

/// Dispatches MCP tool calls to the Pinterest API
pub struct ToolDispatcher {
    api: PinterestClient,
    tokens: Arc<TokenManager>,
}

impl ToolDispatcher {
    pub fn new(api: PinterestClient, tokens: Arc<TokenManager>) -> Self {
        Self { api, tokens }
    }

    /// Execute a tool by name
    ///
    /// # Errors
    /// `AppError::Mcp` when not authenticated, `AppError::InvalidParams`
    /// for an unknown tool or missing required parameter, and whatever the
    /// API call itself surfaces.
    pub async fn execute(&self, tool_name: &str, params: &Value) -> AppResult<Value> {
        let Some(token) = self.tokens.get_valid_token().await? else {
            return Err(AppError::Mcp(AUTH_REQUIRED.to_string()));
        };
        let access_token = token.access_token.as_str();

        debug!("Executing tool: {}", tool_name);

        match tool_name {
            "pinterest_user_get_info" => self.api.get_user_info(access_token).await,

            "pinterest_boards_list" => {
                self.api
                    .list_boards(access_token, page_size(params), bookmark(params))
                    .await
            }

            "pinterest_boards_create" => self.api.create_board(access_token, params).await,

            "pinterest_boards_get" => {
                let board_id = required_str(params, "boardId")?;
                self.api.get_board(access_token, board_id).await
            }

            "pinterest_pins_list" => {
                let board_id = required_str(params, "boardId")?;
                self.api
                    .list_pins(access_token, board_id, page_size(params), bookmark(params))
                    .await
            }

            "pinterest_pins_create" => self.api.create_pin(access_token, params).await,

            "pinterest_pins_get" => {
                let pin_id = required_str(params, "pinId")?;
                self.api.get_pin(access_token, pin_id).await
            }

            other => Err(AppError::InvalidParams(format!("Unknown tool: {}", other))),
        }
    }
}

fn required_str<'a>(params: &'a Value, key: &str) -> AppResult<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidParams(format!("Missing required parameter: {}", key)))
}

fn page_size(params: &Value) -> Option<u32> {
    params
        .get("pageSize")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
}

fn bookmark(params: &Value) -> Option<&str> {
    params
        .get("bookmark")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
