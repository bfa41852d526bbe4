//! OS-specific path resolution for the persisted token record

use pmcp_types::{AppError, AppResult};
use std::path::PathBuf;

/// Get the application data directory
///
/// Priority:
/// 1. Runtime override via `PINTEREST_MCP_ENV` environment variable:
///    `~/.pinterest-mcp-{env}/`
/// 2. Development mode (debug builds): `~/.pinterest-mcp-dev/`
/// 3. Production mode (release builds): `~/.pinterest-mcp/`
pub fn data_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;

    // Runtime override via environment variable (for testing)
    if let Ok(env_suffix) = std::env::var("PINTEREST_MCP_ENV") {
        return Ok(home.join(format!(".pinterest-mcp-{}", env_suffix)));
    }

    #[cfg(debug_assertions)]
    let dir = home.join(".pinterest-mcp-dev");

    #[cfg(not(debug_assertions))]
    let dir = home.join(".pinterest-mcp");

    Ok(dir)
}

/// Get the token record file path
pub fn token_file() -> AppResult<PathBuf> {
    Ok(data_dir()?.join("pinterest_token.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir_exists(path: &PathBuf) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            AppError::Storage(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}
