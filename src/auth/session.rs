//! Session storage.
//!
//! The session is one opaque identifier persisted to a JSON file that plays
//! the role of the browser tab's session storage. No expiry, no rotation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// The identifier of the logged-in principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Result<Self, ClientError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ClientError::MissingSession);
        }
        Ok(Self {
            id,
            created_at: Utc::now(),
        })
    }
}

/// File-backed store holding at most one session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store `id` as the current session, replacing any previous one.
    pub async fn set(&self, id: &str) -> Result<Session, ClientError> {
        let session = Session::new(id)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec_pretty(&session)?;
        tokio::fs::write(&self.path, body).await?;

        tracing::info!("Session started for {}", session.id);
        Ok(session)
    }

    /// Read the current session. A missing or unreadable file means no session.
    pub async fn get(&self) -> Result<Option<Session>, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice::<Session>(&raw) {
            Ok(session) if !session.id.trim().is_empty() => Ok(Some(session)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!("Ignoring malformed session file {:?}: {}", self.path, e);
                Ok(None)
            }
        }
    }

    /// Remove the current session, if any.
    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_set_get_clear() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("tab").join("session.json"));

        assert!(store.get().await.unwrap().is_none());

        store.set("auth-42").await.unwrap();
        let session = store.get().await.unwrap().unwrap();
        assert_eq!(session.id, "auth-42");

        store.set("auth-43").await.unwrap();
        assert_eq!(store.get().await.unwrap().unwrap().id, "auth-43");

        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_none());
        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.set("  ").await, Err(ClientError::MissingSession));
        assert!(store.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_file_reads_as_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let store = SessionStore::new(path);
        assert!(store.get().await.unwrap().is_none());
    }
}
