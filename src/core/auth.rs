//! Session token access
//!
//! The bearer token is kept under a single fixed key in persistent storage.
//! [`Session`] is the only accessor: the token is set on login and cleared
//! on logout or when the backend answers 401.

use crate::core::error::{AuthError, Result, StorageError};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Default storage key holding the token
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Persistent storage for the session token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;

    fn store(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// Token store living only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let token = self
            .token
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(token.clone())
    }

    fn store(&self, token: &str) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .token
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}

/// Token store backed by a JSON file of string keys
///
/// Other keys in the file are preserved; only `key` is touched.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) | Err(_) => Err(StorageError::Token(format!(
                "{} is not a JSON object",
                self.path.display()
            ))
            .into()),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Token(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map
            .get(&self.key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from))
    }

    fn store(&self, token: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(&self.key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Outcome of checking access to a protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allow,
    RedirectToLogin,
}

/// Single accessor for the session token
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Session with an in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn login(&self, token: &str) -> Result<()> {
        self.store.store(token)?;
        tracing::info!("session started");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// Current token; a storage failure reads as signed out
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    /// `Authorization` header value
    pub fn bearer(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    /// Token or [`AuthError::MissingToken`]
    pub fn require(&self) -> Result<String> {
        self.token().ok_or_else(|| AuthError::MissingToken.into())
    }

    /// Access decision for a protected view
    pub fn gate(&self) -> Gate {
        if self.is_signed_in() {
            Gate::Allow
        } else {
            Gate::RedirectToLogin
        }
    }
}
