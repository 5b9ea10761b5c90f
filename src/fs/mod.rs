// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

pub mod mock;

/// Abstract filesystem interface used by the project store.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;

    /// Replace the contents of `path` in one step.
    ///
    /// Readers see either the previous file or the complete new one, even
    /// when several writers replace the same path concurrently (the last
    /// one wins).
    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    // Each call stages into its own uniquely named file next to `path` and
    // renames it over the target. A staging file that is dropped unpersisted
    // deletes itself.
    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("creating dir {:?}", dir))?;

        let mut staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating staging file in {:?}", dir))?;
        staged
            .write_all(contents)
            .with_context(|| format!("writing staging file for {:?}", path))?;
        staged
            .as_file()
            .sync_all()
            .with_context(|| format!("syncing staging file for {:?}", path))?;
        staged
            .persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("replacing {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_creates_then_overwrites_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("Taskshift.toml");
        let fs = RealFileSystem;

        fs.replace(&path, b"first").unwrap();
        fs.replace(&path, b"second").unwrap();

        assert_eq!(fs.read_to_string(&path).unwrap(), "second");
        let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("Taskshift.toml")]);
    }
}
