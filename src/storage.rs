// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted access/refresh token storage.
//!
//! Tokens are plain strings with no expiry metadata; the server decides when
//! an access token is no longer valid.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Access and refresh token issued together by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Storage backend for the two session tokens.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Result<Option<String>, ApiError>;
    fn refresh_token(&self) -> Result<Option<String>, ApiError>;
    /// Replace both tokens at once.
    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), ApiError>;
    /// Remove both tokens.
    fn clear(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTokens {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

fn poisoned<T>(_: T) -> ApiError {
    ApiError::Storage("token store lock poisoned".to_string())
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing pair.
    pub fn with_tokens(tokens: &TokenPair) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens {
                access_token: Some(tokens.access_token.clone()),
                refresh_token: Some(tokens.refresh_token.clone()),
            }),
        }
    }

    /// Store holding only an access token (no way to refresh).
    pub fn with_access_token(access_token: impl Into<String>) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens {
                access_token: Some(access_token.into()),
                refresh_token: None,
            }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.tokens.read().map_err(poisoned)?.access_token.clone())
    }

    fn refresh_token(&self) -> Result<Option<String>, ApiError> {
        Ok(self.tokens.read().map_err(poisoned)?.refresh_token.clone())
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        let mut guard = self.tokens.write().map_err(poisoned)?;
        guard.access_token = Some(tokens.access_token.clone());
        guard.refresh_token = Some(tokens.refresh_token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.tokens.write().map_err(poisoned)? = StoredTokens::default();
        Ok(())
    }
}

/// Token store backed by a JSON file, so a session survives between CLI runs.
///
/// A missing file means no tokens. Reads always go to disk; the lock only
/// serializes writers within this process.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StoredTokens, ApiError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredTokens::default())
            }
            Err(e) => {
                return Err(ApiError::Storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(StoredTokens::default());
        }

        serde_json::from_str(&raw).map_err(|e| {
            ApiError::Storage(format!("Corrupt token file {}: {}", self.path.display(), e))
        })
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Result<Option<String>, ApiError> {
        let _guard = self.lock.read().map_err(poisoned)?;
        Ok(self.load()?.access_token)
    }

    fn refresh_token(&self) -> Result<Option<String>, ApiError> {
        let _guard = self.lock.read().map_err(poisoned)?;
        Ok(self.load()?.refresh_token)
    }

    fn set_tokens(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        let _guard = self.lock.write().map_err(poisoned)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let stored = StoredTokens {
            access_token: Some(tokens.access_token.clone()),
            refresh_token: Some(tokens.refresh_token.clone()),
        };
        let body = serde_json::to_string_pretty(&stored)
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        // Write-then-rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)
            .and_then(|_| std::fs::rename(&tmp, &self.path))
            .map_err(|e| {
                ApiError::Storage(format!("Failed to write {}: {}", self.path.display(), e))
            })
    }

    fn clear(&self) -> Result<(), ApiError> {
        let _guard = self.lock.write().map_err(poisoned)?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
        }
    }

    #[test]
    fn test_memory_store_replace_and_clear() {
        let store = MemoryTokenStore::with_tokens(&pair("a1", "r1"));
        store.set_tokens(&pair("a2", "r2")).unwrap();
        assert_eq!(store.access_token().unwrap().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().unwrap().as_deref(), Some("r2"));

        store.clear().unwrap();
        assert_eq!(store.access_token().unwrap(), None);
        assert_eq!(store.refresh_token().unwrap(), None);
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));
        assert_eq!(store.access_token().unwrap(), None);
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");

        FileTokenStore::new(&path)
            .set_tokens(&pair("access", "refresh"))
            .unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.access_token().unwrap().as_deref(), Some("access"));
        assert_eq!(
            reopened.refresh_token().unwrap().as_deref(),
            Some("refresh")
        );

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"accessToken\""));

        reopened.clear().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.access_token(), Err(ApiError::Storage(_))));
    }
}
