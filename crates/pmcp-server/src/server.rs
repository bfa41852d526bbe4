//! MCP stdio server
//!
//! Reads JSON-RPC requests from stdin line-by-line, dispatches them, and
//! writes responses back to stdout. Logs go to stderr only; stdout carries
//! nothing but JSON-RPC frames.

use crate::handlers::ToolDispatcher;
use crate::protocol::{
    JsonRpcRequest, JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR,
};
use crate::tools::tool_definitions;
use pmcp_types::{AppError, AppResult};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, trace, warn};

/// MCP protocol revision this server speaks
const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server over stdio
pub struct McpServer {
    dispatcher: ToolDispatcher,
    stdin: BufReader<tokio::io::Stdin>,
    stdout: tokio::io::Stdout,
}

impl McpServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher,
            stdin: BufReader::new(tokio::io::stdin()),
            stdout: tokio::io::stdout(),
        }
    }

    /// Run the server main loop until stdin reaches EOF
    pub async fn run(mut self) -> AppResult<()> {
        info!("Pinterest MCP server running on stdio");

        let mut line = String::new();

        loop {
            line.clear();

            match self.stdin.read_line(&mut line).await {
                Ok(0) => {
                    debug!("EOF reached on stdin, exiting");
                    break;
                }
                Ok(n) => {
                    trace!("Read {} bytes from stdin", n);
                    if line.trim().is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<JsonRpcRequest>(&line) {
                        Ok(request) => {
                            debug!("Received request: method={}", request.method);

                            // Notifications get no response.
                            let Some(id) = request.id.clone() else {
                                trace!("Notification {}, no response", request.method);
                                continue;
                            };

                            let response = self.handle_request(id, request).await;
                            self.write_response(&response).await?;
                        }
                        Err(e) => {
                            warn!("Failed to parse JSON-RPC request: {}", e);
                            let response = JsonRpcResponse::error(
                                Value::Null,
                                PARSE_ERROR,
                                format!("Parse error: {}", e),
                                None,
                            );
                            self.write_response(&response).await?;
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    async fn write_response(&mut self, response: &JsonRpcResponse) -> AppResult<()> {
        let serialized = serde_json::to_string(response)?;
        self.stdout.write_all(serialized.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await?;
        trace!("Response written to stdout");
        Ok(())
    }

    async fn handle_request(&self, id: Value, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": { "tools": {} },
                    "serverInfo": {
                        "name": "pinterest-mcp-server",
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            ),

            "ping" => JsonRpcResponse::success(id, json!({})),

            "tools/list" => {
                JsonRpcResponse::success(id, json!({ "tools": tool_definitions() }))
            }

            "tools/call" => {
                let params = request.params.unwrap_or(Value::Null);
                let Some(tool_name) = params.get("name").and_then(Value::as_str) else {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        "tools/call requires a tool name".to_string(),
                        None,
                    );
                };
                let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

                match self.dispatcher.execute(tool_name, &arguments).await {
                    Ok(result) => {
                        let text = serde_json::to_string_pretty(&result)
                            .unwrap_or_else(|_| result.to_string());
                        JsonRpcResponse::success(
                            id,
                            json!({
                                "content": [{ "type": "text", "text": text }]
                            }),
                        )
                    }
                    Err(e) => {
                        error!("Tool {} failed: {}", tool_name, e);
                        let (code, message, data) = map_tool_error(e);
                        JsonRpcResponse::error(id, code, message, data)
                    }
                }
            }

            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
                None,
            ),
        }
    }
}

/// Map an application error onto a JSON-RPC error triple
///
/// The provider's error payload rides along as `data` when present, so the
/// agent sees what the provider actually said.
fn map_tool_error(err: AppError) -> (i64, String, Option<Value>) {
    match err {
        AppError::Mcp(message) => (INVALID_REQUEST, message, None),
        AppError::InvalidParams(message) => (INVALID_PARAMS, message, None),
        AppError::Exchange { message, payload } => {
            (INTERNAL_ERROR, format!("Token exchange failed: {}", message), payload)
        }
        AppError::Api { message, payload } => (INTERNAL_ERROR, message, payload),
        other => (INTERNAL_ERROR, other.to_string(), None),
    }
}
