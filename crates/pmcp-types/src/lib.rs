//! Shared types and error types for the Pinterest MCP server

pub mod errors;

pub use errors::{AppError, AppResult};
