//! Shared test harness utilities for formatcheck crates.

use std::fs;
use std::path::{Path, PathBuf};

use formatcheck_config::{Config, LoadOptions};
use tempfile::TempDir;

/// Temporary project directory populated with fixture files.
pub struct Fixture {
    _dir: TempDir,
    root: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        let root = fs::canonicalize(dir.path()).expect("canonicalize tempdir");
        Fixture { _dir: dir, root }
    }

    /// Fixture containing `files`, given as `(relative path, contents)`.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let fixture = Fixture::new();
        for (path, contents) in files {
            fixture.write(path, contents);
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture directories");
        }
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("read fixture file")
    }

    /// Configuration loaded with the fixture as working directory.
    pub fn config(&self) -> Config {
        Config::load(LoadOptions::default().with_working_dir(&self.root)).expect("load config")
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Fixture::new()
    }
}
