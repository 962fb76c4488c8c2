//! Token stores: where the bearer credential is read from at request time.

use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// Key the access token is stored under.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Read-only key-value lookup for credentials.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// In-process token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only an access token.
    pub fn with_access_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(ACCESS_TOKEN_KEY, token);
        store
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        // poisoned lock: the map is still usable
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

/// Token store persisted as a flat JSON object on disk.
///
/// Every `get` re-reads the file so that a token written by another process
/// (for example `fetchwrap token set`) is picked up by the next request.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<config dir>/fetchwrap/tokens.json`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs_next::config_dir()
            .map(|p| p.join("fetchwrap"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tokens.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable file counts as empty.
    fn load(&self) -> HashMap<String, String> {
        if let Ok(data) = fs::read(&self.path) {
            if let Ok(map) = serde_json::from_slice::<HashMap<String, String>>(&data) {
                return map;
            }
            debug!(path = %self.path.display(), "token file is not a json object; ignoring");
        }
        HashMap::new()
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(values)?;
        fs::write(&self.path, data)?;
        Ok(())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display()))]
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    /// Removes `key`; returns whether it was present.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut values = self.load();
        let existed = values.remove(key).is_some();
        if existed {
            self.save(&values)?;
        }
        Ok(existed)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }
}
