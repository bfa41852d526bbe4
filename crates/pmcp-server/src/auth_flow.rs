//! One-shot browser authorization flow
//!
//! Prints the Pinterest consent URL, listens on the redirect port for the
//! callback, exchanges the authorization code, and shuts down after the
//! first completed callback.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use pmcp_config::AppConfig;
use pmcp_oauth::{authorization_url, Token, TokenExchanger, TokenStore};
use pmcp_types::{AppError, AppResult};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    #[serde(default)]
    code: Option<String>,

    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
struct AuthFlowState {
    exchanger: Arc<TokenExchanger>,
    store: Arc<dyn TokenStore>,
    outcome: Arc<Mutex<Option<AppResult<Token>>>>,
    shutdown: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

/// Run the authorization flow to completion
///
/// # Errors
/// `AppError::Exchange` if the provider rejects the code exchange,
/// `AppError::Config` if the user denied access or the flow ended without
/// a callback, I/O errors if the callback port cannot be bound.
pub async fn run(config: AppConfig, store: Arc<dyn TokenStore>) -> AppResult<Token> {
    let auth_url = authorization_url(&config);
    let port = config.callback_port();

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let state = AuthFlowState {
        exchanger: Arc::new(TokenExchanger::new(config)),
        store,
        outcome: Arc::new(Mutex::new(None)),
        shutdown: Arc::new(Mutex::new(Some(shutdown_tx))),
    };

    let app = Router::new()
        .route("/", get(handle_callback))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .map_err(|e| {
            AppError::Config(format!("Failed to bind callback port {}: {}", port, e))
        })?;

    info!("Authorization callback server listening on port {}", port);
    println!("Open this URL in your browser to authorize with Pinterest:");
    println!();
    println!("  {}", auth_url);
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .await?;

    let outcome = state.outcome.lock().take();
    outcome.unwrap_or_else(|| {
        Err(AppError::Config(
            "Authorization flow ended without a callback".to_string(),
        ))
    })
}

async fn handle_callback(
    State(state): State<AuthFlowState>,
    Query(query): Query<CallbackQuery>,
) -> (StatusCode, Html<String>) {
    if let Some(denied) = query.error {
        error!("Authorization denied: {}", denied);
        *state.outcome.lock() = Some(Err(AppError::Config(format!(
            "Authorization denied: {}",
            denied
        ))));
        shutdown(&state);
        return (
            StatusCode::BAD_REQUEST,
            page("Authentication Failed", &format!("Pinterest reported: {}", denied)),
        );
    }

    let Some(code) = query.code else {
        // Stray request (favicon etc.); keep listening for the real callback.
        return (
            StatusCode::BAD_REQUEST,
            page("Missing Code", "No authorization code provided."),
        );
    };

    info!("Authorization code received, exchanging for token");
    match state.exchanger.exchange_code(&code, state.store.as_ref()).await {
        Ok(token) => {
            *state.outcome.lock() = Some(Ok(token));
            shutdown(&state);
            (
                StatusCode::OK,
                page(
                    "Authentication Successful",
                    "Your Pinterest MCP server is now authenticated. \
                     You can close this window.",
                ),
            )
        }
        Err(e) => {
            error!("Code exchange failed: {}", e);
            let message = e.to_string();
            *state.outcome.lock() = Some(Err(e));
            shutdown(&state);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                page("Authentication Failed", &message),
            )
        }
    }
}

fn shutdown(state: &AuthFlowState) {
    if let Some(tx) = state.shutdown.lock().take() {
        let _ = tx.send(());
    }
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<html><body style=\"font-family: sans-serif; text-align: center; padding: 50px;\">\
         <h1>{}</h1><p>{}</p></body></html>",
        title, body
    ))
}
