//! Storage backends for the persisted blob.

use super::errors::PersistenceResult;
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Where the persisted blob is kept
#[async_trait]
pub trait StateStorage: Send + Sync {
    /// Replace the stored blob
    async fn write(&self, contents: &str) -> PersistenceResult<()>;

    /// Stored blob, or `None` when nothing was saved yet
    async fn read(&self) -> PersistenceResult<Option<String>>;
}

/// Blob stored in a single JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl StateStorage for FileStorage {
    async fn write(&self, contents: &str) -> PersistenceResult<()> {
        // a crash mid-write leaves the previous file intact
        let temp = self.temp_path();
        tokio::fs::write(&temp, contents).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    async fn read(&self) -> PersistenceResult<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory blob, shared between clones
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with a blob
    pub fn with_contents(contents: impl Into<String>) -> Self {
        let storage = Self::default();
        if let Ok(mut slot) = storage.contents.lock() {
            *slot = Some(contents.into());
        }
        storage
    }

    /// Current blob without going through the async trait
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }

    /// Number of completed writes
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }
}

#[async_trait]
impl StateStorage for MemoryStorage {
    async fn write(&self, contents: &str) -> PersistenceResult<()> {
        if let Ok(mut slot) = self.contents.lock() {
            *slot = Some(contents.to_string());
        }
        if let Ok(mut writes) = self.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }

    async fn read(&self) -> PersistenceResult<Option<String>> {
        Ok(self.contents())
    }
}
