use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{ConsoleError, ConsoleResult};

/// Keys held by the durable session store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    AccessToken,
    RefreshToken,
    CurrentUser,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [
        StorageKey::AccessToken,
        StorageKey::RefreshToken,
        StorageKey::CurrentUser,
    ];

    /// Name of the key on disk
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::AccessToken => "sports_access_token",
            StorageKey::RefreshToken => "sports_refresh_token",
            StorageKey::CurrentUser => "sports_current_user",
        }
    }
}

/// Durable key-value storage for the session.
///
/// Multi-key writes and removals are applied as one unit.
pub trait SessionStore: Send + Sync + Debug {
    fn get(&self, key: StorageKey) -> ConsoleResult<Option<String>>;

    fn set_many(&self, entries: &[(StorageKey, String)]) -> ConsoleResult<()>;

    fn remove_many(&self, keys: &[StorageKey]) -> ConsoleResult<()>;

    fn set(&self, key: StorageKey, value: String) -> ConsoleResult<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: StorageKey) -> ConsoleResult<()> {
        self.remove_many(&[key])
    }

    /// Remove every session key
    fn clear(&self) -> ConsoleResult<()> {
        self.remove_many(&StorageKey::ALL)
    }
}

/// Session store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<StorageKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: StorageKey) -> ConsoleResult<Option<String>> {
        Ok(self.entries.lock().get(&key).cloned())
    }

    fn set_many(&self, entries: &[(StorageKey, String)]) -> ConsoleResult<()> {
        let mut map = self.entries.lock();
        for (key, value) in entries {
            map.insert(*key, value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[StorageKey]) -> ConsoleResult<()> {
        let mut map = self.entries.lock();
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }
}

/// On-disk layout of the session file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionFilePayload {
    entries: BTreeMap<String, String>,
    saved_at: DateTime<Utc>,
    integrity_hash: String,
}

/// Session store persisted as a JSON file with an integrity hash.
///
/// Every change rewrites the whole file through a temporary file and a
/// rename, so readers never see half of a multi-key update.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`, starting empty when the file is missing.
    ///
    /// A file that cannot be parsed or fails its integrity check is discarded.
    pub fn open(path: impl Into<PathBuf>) -> ConsoleResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            match Self::decode(&raw) {
                Some(entries) => {
                    debug!(path = %path.display(), keys = entries.len(), "Loaded session file");
                    entries
                }
                None => {
                    warn!(path = %path.display(), "Session file is corrupt or was tampered with, discarding");
                    BTreeMap::new()
                }
            }
        } else {
            debug!(path = %path.display(), "No session file yet");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn decode(raw: &str) -> Option<BTreeMap<String, String>> {
        let payload: SessionFilePayload = serde_json::from_str(raw).ok()?;
        if integrity_hash(&payload.entries) != payload.integrity_hash {
            return None;
        }
        Some(payload.entries)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ConsoleResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let payload = SessionFilePayload {
            entries: entries.clone(),
            saved_at: Utc::now(),
            integrity_hash: integrity_hash(entries),
        };
        let contents = serde_json::to_string_pretty(&payload)
            .map_err(|e| ConsoleError::Storage(format!("Failed to serialize session: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), keys = entries.len(), "Session file saved");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: StorageKey) -> ConsoleResult<Option<String>> {
        Ok(self.entries.lock().get(key.as_str()).cloned())
    }

    fn set_many(&self, entries: &[(StorageKey, String)]) -> ConsoleResult<()> {
        let mut map = self.entries.lock();
        let mut next = map.clone();
        for (key, value) in entries {
            next.insert(key.as_str().to_string(), value.clone());
        }
        self.persist(&next)?;
        *map = next;
        Ok(())
    }

    fn remove_many(&self, keys: &[StorageKey]) -> ConsoleResult<()> {
        let mut map = self.entries.lock();
        let mut next = map.clone();
        let mut removed = 0;
        for key in keys {
            if next.remove(key.as_str()).is_some() {
                removed += 1;
            }
        }
        if removed == 0 {
            return Ok(());
        }
        // Removed keys are gone from memory even when the file cannot be rewritten
        *map = next;
        self.persist(&map)?;
        info!(removed, "Session keys removed");
        Ok(())
    }
}

/// Calculate an integrity hash over the stored entries
fn integrity_hash(entries: &BTreeMap<String, String>) -> String {
    let mut hasher = Sha256::new();
    for (key, value) in entries {
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
