#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use taskshift::cli::Command;
use taskshift::engine::Session;
use taskshift::execute;
use taskshift::fs::RealFileSystem;
use taskshift::store::FileStore;

pub use taskshift_test_utils::{date, init_tracing};

/// A project file living in a temporary directory.
pub struct TempProject {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TempProject {
    /// Empty project owned by `owner`.
    pub fn new(owner: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("Taskshift.toml");
        FileStore::open_or_create(RealFileSystem, &path, owner).expect("create project");
        Self { _dir: dir, path }
    }

    /// Project file with the given TOML contents.
    pub fn with_contents(contents: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("Taskshift.toml");
        std::fs::write(&path, contents).expect("write project file");
        Self { _dir: dir, path }
    }

    pub fn session(&self) -> Session<FileStore<RealFileSystem>> {
        Session::new(FileStore::open(RealFileSystem, &self.path).expect("open project"))
            .with_today(date("2024-06-01"))
    }

    /// Run one CLI command and return what it printed.
    pub fn run(&self, command: Command) -> String {
        let mut out = Vec::new();
        execute(&self.session(), command, &mut out).expect("command succeeds");
        String::from_utf8(out).expect("utf-8 output")
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read project file")
    }

    pub fn dir(&self) -> &Path {
        self.path.parent().expect("project file has a parent")
    }
}
