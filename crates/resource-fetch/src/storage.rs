//! Local storage abstractions.
//!
//! The fetcher only needs three operations: an existence check, directory
//! creation and whole-file writes.
//!
//! # Implementations
//!
//! - [`FsStorage`]: The real filesystem
//! - [`MemoryStorage`]: Shared in-memory map, for tests and dry runs

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use crate::error::{Error, Result};

/// Storage for fetched resources.
pub trait Storage {
    /// Check whether a file exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create a directory and all of its parents. Succeeds if it already exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Write a whole file, replacing any previous contents.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;
}

/// Storage backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| Error::storage("create_dir_all", path, &e))
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data).map_err(|e| Error::storage("write", path, &e))
    }
}

/// An in-memory storage.
///
/// Clones share the same contents, so a test can hand one clone to the
/// fetcher and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    data: Arc<RwLock<MemoryStorageInner>>,
}

#[derive(Debug, Default)]
struct MemoryStorageInner {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file directly, bypassing the parent directory check.
    pub fn insert(&self, path: impl Into<PathBuf>, data: Vec<u8>) {
        self.data.write().unwrap().files.insert(path.into(), data);
    }

    /// Get a copy of a stored file.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.data.read().unwrap().files.get(path).cloned()
    }

    /// Check whether a directory was created.
    #[must_use]
    pub fn has_dir(&self, path: &Path) -> bool {
        self.data.read().unwrap().dirs.contains(path)
    }

    /// Get the number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().unwrap().files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.data.read().unwrap().files.contains_key(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut inner = self.data.write().unwrap();
        for dir in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            inner.dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let mut inner = self.data.write().unwrap();

        // Mirror the filesystem: writing into a missing directory fails.
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !inner.dirs.contains(parent)
        {
            let e = std::io::Error::new(std::io::ErrorKind::NotFound, "parent directory missing");
            return Err(Error::storage("write", path, &e));
        }

        inner.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_requires_parent() {
        let storage = MemoryStorage::new();
        let path = Path::new("/game/audio/calm1.ogg");

        assert!(storage.write(path, b"ogg").is_err());

        storage.create_dir_all(Path::new("/game/audio")).unwrap();
        storage.write(path, b"ogg").unwrap();
        assert!(storage.exists(path));
        assert!(storage.has_dir(Path::new("/game")));
        assert_eq!(storage.get(path), Some(b"ogg".to_vec()));
    }

    #[test]
    fn test_memory_storage_clones_share_contents() {
        let storage = MemoryStorage::new();
        let other = storage.clone();
        storage.insert("/game/default.zip", vec![1, 2, 3]);
        assert!(other.exists(Path::new("/game/default.zip")));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_fs_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("audio");
        let file = audio.join("dig.bin");
        let storage = FsStorage;

        assert!(!storage.exists(&file));
        storage.create_dir_all(&audio).unwrap();
        storage.create_dir_all(&audio).unwrap();
        storage.write(&file, &[7, 8, 9]).unwrap();

        assert!(storage.exists(&file));
        assert_eq!(std::fs::read(&file).unwrap(), vec![7, 8, 9]);
    }

    #[test]
    fn test_fs_storage_write_error_has_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing").join("step.bin");
        let err = FsStorage.write(&file, &[1]).unwrap_err();
        match err {
            Error::Storage { operation, path, .. } => {
                assert_eq!(operation, "write");
                assert_eq!(path, file);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
