//! OAuth token lifecycle management for the Pinterest MCP server
//!
//! This crate owns the full lifecycle of the Pinterest OAuth token:
//! - [`Token`] model and expiry policy
//! - [`TokenStore`] persistence seam with file and in-memory implementations
//! - [`TokenExchanger`] for authorization-code and refresh-token exchanges
//! - [`TokenManager`] orchestrator exposing `get_valid_token` /
//!   `revoke_current`
//! - authorization URL construction for the browser consent flow

pub mod authorize;
pub mod exchange;
pub mod manager;
pub mod store;
pub mod token;

pub use authorize::authorization_url;
pub use exchange::TokenExchanger;
pub use manager::TokenManager;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::Token;
