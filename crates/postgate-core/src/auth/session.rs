use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::gate::session_present;

/// Store key holding the raw token string
pub const TOKEN_KEY: &str = "token";

/// Store key holding the JSON-encoded user profile
pub const USER_KEY: &str = "user";

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Persistent string key-value storage owning the session credential.
///
/// Every call is a single atomic operation; implementations take `&self` so
/// concurrent submissions can share one store.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry, for comparing store state before and after an action
    pub fn snapshot(&self) -> HashMap<String, String> {
        lock(&self.entries).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object in `<dir>/session.json`.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents =
            std::fs::read_to_string(&self.path).context("Failed to read session file")?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).context("Failed to parse session file")
    }

    /// Replace the session file atomically: write a sibling temp file, then rename
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).context("Failed to create session directory")?;

        let contents = serde_json::to_string_pretty(entries)?;
        let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temp session file")?;
        tmp.write_all(contents.as_bytes())
            .context("Failed to write session file")?;
        tmp.as_file().sync_all().context("Failed to sync session file")?;
        tmp.persist(&self.path)
            .context("Failed to replace session file")?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = lock(&self.write_lock);
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = lock(&self.write_lock);
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = lock(&self.write_lock);
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// The token/user pair representing an authenticated visitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub token: String,
    #[serde(default)]
    pub user: Value,
}

impl SessionCredential {
    /// Write the JSON-encoded user, then the token.
    ///
    /// The token goes last so the credential only becomes present once both
    /// writes succeeded. On failure whatever was written is removed again.
    pub fn save(&self, store: &dyn SessionStore) -> Result<()> {
        let user = serde_json::to_string(&self.user).context("Failed to encode user profile")?;
        let written = store
            .set(USER_KEY, &user)
            .and_then(|()| store.set(TOKEN_KEY, &self.token));
        if let Err(e) = written {
            if let Err(rollback) = Self::clear(store) {
                warn!(error = %rollback, "Failed to roll back partial session credential");
            }
            return Err(e);
        }
        debug!("Session credential saved");
        Ok(())
    }

    /// Read the stored credential, if one is present.
    ///
    /// A missing `user` entry loads as `null`.
    pub fn load(store: &dyn SessionStore) -> Result<Option<Self>> {
        let token = match store.get(TOKEN_KEY)? {
            Some(token) if session_present(Some(&token)) => token,
            _ => return Ok(None),
        };
        let user = match store.get(USER_KEY)? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to parse stored user")?,
            None => Value::Null,
        };
        Ok(Some(Self { token, user }))
    }

    /// Remove both entries from the store
    pub fn clear(store: &dyn SessionStore) -> Result<()> {
        store.remove(TOKEN_KEY)?;
        store.remove(USER_KEY)?;
        debug!("Session credential cleared");
        Ok(())
    }
}
