//! Persistent token storage
//!
//! The store exclusively owns the durable representation of the single
//! token record. Everything else holds at most a transient copy returned
//! from an operation. Concurrent writers are not coordinated; the last
//! writer wins.

use crate::token::Token;
use async_trait::async_trait;
use parking_lot::RwLock;
use pmcp_types::{AppError, AppResult};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Persistence seam for the single token record
///
/// Read failures of any kind degrade to "no token found"; a silently lost
/// record only costs a re-authentication, while a propagated read error
/// would take the whole server down. Write failures are surfaced.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Return the last successfully written token, or `None` if no record
    /// exists or the persisted data is unparseable.
    async fn read(&self) -> AppResult<Option<Token>>;

    /// Atomically replace the stored record.
    async fn write(&self, token: &Token) -> AppResult<()>;

    /// Remove the stored record. Clearing a nonexistent record is a no-op
    /// success.
    async fn clear(&self) -> AppResult<()>;
}

/// File-backed token store
///
/// Persists the record as a single pretty-printed JSON object. Writes go
/// through a temp file in the same directory followed by a rename, so a
/// crash mid-write never leaves a truncated record behind.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn read(&self) -> AppResult<Option<Token>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No token file found at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_str::<Token>(&contents) {
            Ok(token) if token.access_token.is_empty() => {
                warn!("Persisted token record has empty access_token, ignoring");
                Ok(None)
            }
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Persisted token record is unparseable, ignoring: {}", e);
                Ok(None)
            }
        }
    }

    async fn write(&self, token: &Token) -> AppResult<()> {
        if token.access_token.is_empty() {
            return Err(AppError::Storage(
                "Refusing to persist token with empty access_token".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::Storage(format!(
                    "Failed to create token directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(token)?;

        // Temp file lives next to the target so the rename stays on one
        // filesystem.
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to write token file {}: {}",
                tmp_path.display(),
                e
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to replace token file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Token stored at {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!("Token file {} removed", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove token file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// In-memory token store for tests and embedding
#[derive(Default)]
pub struct MemoryTokenStore {
    record: RwLock<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store
    pub fn with_token(token: Token) -> Self {
        Self {
            record: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn read(&self) -> AppResult<Option<Token>> {
        Ok(self.record.read().clone())
    }

    async fn write(&self, token: &Token) -> AppResult<()> {
        if token.access_token.is_empty() {
            return Err(AppError::Storage(
                "Refusing to persist token with empty access_token".to_string(),
            ));
        }
        *self.record.write() = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.record.write() = None;
        Ok(())
    }
}
