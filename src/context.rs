// File: ./src/context.rs
//! Where jotter keeps its files.
//!
//! Anything doing file IO receives an [`AppContext`] explicitly; there are
//! no global paths.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn data_dir(&self) -> Result<PathBuf>;
    fn config_dir(&self) -> Result<PathBuf>;

    fn config_path(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    fn entries_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("entries.json"))
    }
}

fn created(path: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create directory '{}'", path.display()))?;
    Ok(path)
}

/// Platform directories, or `<root>/data` and `<root>/config` under `--root`.
#[derive(Clone, Debug)]
pub struct StandardContext {
    root: Option<PathBuf>,
}

impl StandardContext {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    fn dir(&self, sub: &str, platform: fn(&ProjectDirs) -> &Path) -> Result<PathBuf> {
        match &self.root {
            Some(root) => created(root.join(sub)),
            None => {
                let dirs = ProjectDirs::from("com", "jotter", "jotter")
                    .context("Could not determine a home directory")?;
                created(platform(&dirs).to_path_buf())
            }
        }
    }
}

impl AppContext for StandardContext {
    fn data_dir(&self) -> Result<PathBuf> {
        self.dir("data", ProjectDirs::data_dir)
    }

    fn config_dir(&self) -> Result<PathBuf> {
        self.dir("config", ProjectDirs::config_dir)
    }
}

/// A `--root` style context in a fresh temp directory, deleted on drop.
/// Used by the test suites.
#[derive(Debug)]
pub struct TestContext {
    pub root: PathBuf,
    inner: StandardContext,
}

impl TestContext {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("jotter_test_{}", uuid::Uuid::new_v4()));
        Self {
            inner: StandardContext::new(Some(root.clone())),
            root,
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn data_dir(&self) -> Result<PathBuf> {
        self.inner.data_dir()
    }

    fn config_dir(&self) -> Result<PathBuf> {
        self.inner.config_dir()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}
