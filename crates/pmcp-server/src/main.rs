//! Pinterest MCP server binary
//!
//! Subcommands:
//! - `serve` (default): MCP server over stdio for agent integration
//! - `auth`: one-shot browser authorization flow
//! - `revoke`: revoke the current token and clear local state

mod auth_flow;
mod handlers;
mod protocol;
mod server;
mod tools;

use clap::{Parser, Subcommand};
use handlers::ToolDispatcher;
use pmcp_api::PinterestClient;
use pmcp_config::AppConfig;
use pmcp_oauth::{FileTokenStore, TokenExchanger, TokenManager, TokenStore};
use pmcp_types::AppResult;
use server::McpServer;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pinterest-mcp", version, about = "Pinterest MCP server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the MCP server over stdio (default)
    Serve,

    /// Authorize with Pinterest via the browser consent flow
    Auth,

    /// Revoke the current token and clear local state
    Revoke,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout is reserved for JSON-RPC frames.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_path.clone()));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let tokens = Arc::new(TokenManager::new(
                store,
                TokenExchanger::new(config.clone()),
                config.refresh_buffer_seconds,
            ));
            let api = PinterestClient::new(config.api_base_url.clone());
            McpServer::new(ToolDispatcher::new(api, tokens)).run().await
        }

        Command::Auth => {
            let token = auth_flow::run(config, store).await?;
            println!("Authentication successful.");
            if !token.scopes.is_empty() {
                println!("Granted scopes: {}", token.scopes.join(", "));
            }
            Ok(())
        }

        Command::Revoke => {
            let tokens = TokenManager::new(
                store,
                TokenExchanger::new(config.clone()),
                config.refresh_buffer_seconds,
            );
            if tokens.revoke_current().await? {
                println!("Token revoked and local record cleared.");
            } else {
                println!("No token stored; nothing to revoke.");
            }
            Ok(())
        }
    }
}
