//! The bearer token used by every API call, and where it is persisted.
//!
//! Signing in is done elsewhere; this console only reads the token that was
//! saved to `<config dir>/roster/session.json` (or `ROSTER_TOKEN_FILE`).

use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use roster_states::{SnapshotClone, State, assign_impl};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BusinessConfig;

/// Token of the signed-in administrator.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthSession {
    token: Option<String>,
}

impl AuthSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self::new(Some(token.into()))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SnapshotClone for AuthSession {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(self.clone()))
    }
}

impl State for AuthSession {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        assign_impl(self, new_self);
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to determine the config directory")]
    NoConfigDir,
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, TokenStoreError>;

    fn save(&self, token: &str) -> Result<(), TokenStoreError>;

    fn clear(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
}

/// JSON file holding `{ "token": "..." }`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/roster/session.json`
    pub fn default_path() -> Result<PathBuf, TokenStoreError> {
        dirs::config_dir()
            .map(|dir| dir.join("roster").join("session.json"))
            .ok_or(TokenStoreError::NoConfigDir)
    }

    /// Uses `token_file` from the config, else [`Self::default_path`].
    pub fn from_config(config: &BusinessConfig) -> Result<Self, TokenStoreError> {
        match &config.token_file {
            Some(path) => Ok(Self::new(path)),
            None => Self::default_path().map(Self::new),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let stored: StoredSession =
            serde_json::from_str(&content).map_err(|source| TokenStoreError::Format {
                path: self.path.clone(),
                source,
            })?;
        Ok(stored.token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let stored = StoredSession {
            token: Some(token.to_owned()),
        };
        let content =
            serde_json::to_string_pretty(&stored).map_err(|source| TokenStoreError::Format {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Process-local store for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Mutex::new(token),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.token.lock().map(|t| t.clone()).unwrap_or_default())
    }

    fn save(&self, token: &str) -> Result<(), TokenStoreError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_owned());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// Read the session from `store`. A broken store logs and yields no token.
pub fn load_session(store: &dyn TokenStore) -> AuthSession {
    match store.load() {
        Ok(token) => {
            if token.is_none() {
                log::warn!("No saved session token; API calls will be rejected");
            }
            AuthSession::new(token)
        }
        Err(err) => {
            log::error!("{err}");
            AuthSession::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), None);
        assert!(!load_session(&store).is_authenticated());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        store.save("abc123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc123"));
        assert_eq!(load_session(&store).token(), Some("abc123"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_garbage_file_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.load(), Err(TokenStoreError::Format { .. })));
        assert!(!load_session(&store).is_authenticated());
    }

    #[test]
    fn test_config_token_file_wins() {
        let mut config = BusinessConfig::default();
        config.token_file = Some(PathBuf::from("/tmp/custom-session.json"));
        let store = FileTokenStore::from_config(&config).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/custom-session.json"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::default();
        assert_eq!(store.load().unwrap(), None);
        store.save("t").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("t"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_empty_token_is_not_a_session() {
        assert!(!AuthSession::new(Some(String::new())).is_authenticated());
        assert!(!format!("{:?}", AuthSession::authenticated("secret")).contains("secret"));
    }
}
