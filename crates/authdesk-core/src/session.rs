//! Session token storage.
//!
//! The session is a single token kept under the fixed key `token` in a durable
//! key-value file (`<home>/session.json`, mode 0600 on unix). Tokens are never
//! logged or displayed in full.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Storage key holding the session token.
pub const TOKEN_KEY: &str = "token";

/// Durable slot for the session token.
///
/// `save` is called on login/registration, `clear` on logout or when the
/// backend rejects the token. Nothing tracks expiry client-side.
pub trait SessionStore {
    fn save(&mut self, token: &str) -> Result<()>;

    fn read(&self) -> Result<Option<String>>;

    /// Removes the token. Returns whether one was present.
    fn clear(&mut self) -> Result<bool>;
}

/// On-disk key-value storage.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StorageFile {
    #[serde(flatten)]
    entries: BTreeMap<String, String>,
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<home>/session.json`.
    pub fn open_default() -> Self {
        Self::new(paths::session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StorageFile> {
        if !self.path.exists() {
            return Ok(StorageFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(StorageFile::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    fn store(&self, file: &StorageFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(file).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut handle = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            handle
                .write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn save(&mut self, token: &str) -> Result<()> {
        let mut file = self.load()?;
        file.entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.store(&file)
    }

    fn read(&self) -> Result<Option<String>> {
        let file = self.load()?;
        Ok(file
            .entries
            .get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .cloned())
    }

    fn clear(&mut self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let mut file = self.load()?;
        let had_token = file.entries.remove(TOKEN_KEY).is_some();
        self.store(&file)?;
        Ok(had_token)
    }
}

/// Process-local store, for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl MemorySessionStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn clear(&mut self) -> Result<bool> {
        Ok(self.token.take().is_some())
    }
}
