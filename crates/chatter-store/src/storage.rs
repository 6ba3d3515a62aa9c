//! Key-value storage engine.
//!
//! The durable layout is deliberately simple: six independent JSON documents,
//! each stored under a fixed string key (see [`chatter_shared::constants`]).
//! The [`Storage`] trait abstracts over where those documents live so the
//! [`Store`](crate::Store) can be tested against an in-memory backend.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::StoreError;
use crate::Result;

/// A flat string-keyed document store.
pub trait Storage: Send {
    /// Fetch the document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous document.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the document stored under `key`.  Removing an absent key is
    /// not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// File backend
// ---------------------------------------------------------------------------

/// File-backed storage: one `<key>.json` file per document inside a single
/// directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (or create) the default application storage directory.
    ///
    /// The directory is placed in the platform-appropriate data location:
    /// - Linux:   `~/.local/share/chatter/`
    /// - macOS:   `~/Library/Application Support/com.chatter.chatter/`
    /// - Windows: `{FOLDERID_RoamingAppData}\chatter\chatter\data\`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "chatter", "chatter").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir().to_path_buf();

        tracing::info!(path = %data_dir.display(), "opening storage directory");

        Self::open_at(&data_dir)
    }

    /// Open (or create) a storage directory at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Return the directory backing this storage.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.file_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        // Atomic replace: temp file + rename.
        let path = self.file_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.file_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Memory backend
// ---------------------------------------------------------------------------

/// In-memory storage for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
