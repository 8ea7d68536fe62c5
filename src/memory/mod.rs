//! Adapter for the external memory store.
//!
//! The store's contents belong to the orchestration framework; opsagent only
//! resolves the backing directory and checks that it exists. The directory is
//! always passed as an explicit value, never read from or written to a shared
//! global environment map, so benchmark runs against different directories
//! stay isolated.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle onto the memory store's backing directory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    dir: PathBuf,
    enabled: bool,
}

impl MemoryStore {
    /// Create a handle for an explicit storage directory.
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    /// Whether crew runs should record to memory.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the backing directory currently exists on disk.
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    /// Create the backing directory if missing.
    pub fn ensure_dir(&self) -> crate::error::Result<()> {
        if !self.exists() {
            debug!("Creating memory storage directory {:?}", self.dir);
            std::fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_and_exists() {
        let tmp = tempfile::tempdir().unwrap();
        let store = MemoryStore::new(tmp.path().join("memory"), true);

        assert!(!store.exists());
        store.ensure_dir().unwrap();
        assert!(store.exists());
    }
}
