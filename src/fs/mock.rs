// src/fs/mock.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, bail};

use super::FileSystem;

#[derive(Debug, Default)]
struct Disk {
    files: HashMap<PathBuf, Vec<u8>>,
    broken: Option<PathBuf>,
}

/// In-memory filesystem for tests.
///
/// Clones share one disk, so a test can hold on to a handle and look at what
/// the store left behind. [`MockFileSystem::fail_writes_to`] breaks a single
/// path to exercise the store's all-or-nothing writes. `replace` swaps the
/// whole entry under one lock.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    disk: Arc<Mutex<Disk>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn disk(&self) -> MutexGuard<'_, Disk> {
        self.disk.lock().unwrap()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.disk()
            .files
            .insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Make every later write to `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) {
        self.disk().broken = Some(path.as_ref().to_path_buf());
    }

    /// Paths currently on the disk, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.disk().files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let Some(bytes) = self.disk().files.get(path).cloned() else {
            bail!("no such file: {}", path.display());
        };
        Ok(String::from_utf8(bytes)?)
    }

    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut disk = self.disk();
        if disk.broken.as_deref() == Some(path) {
            bail!("injected write failure: {}", path.display());
        }
        disk.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.disk().files.contains_key(path)
    }
}
