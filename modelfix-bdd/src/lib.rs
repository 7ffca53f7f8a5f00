//! BDD harness (cucumber-rs).
//!
//! This crate exists to keep scenario tests isolated from the production crates.
//! It only carries the scratch-repository helper the step definitions share.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tempfile::TempDir;

/// A throwaway working tree.
#[derive(Debug)]
pub struct ScratchRepo {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl ScratchRepo {
    pub fn new() -> anyhow::Result<Self> {
        let temp = tempfile::tempdir().context("create temp dir")?;
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("non-UTF-8 temp path {}", p.display()))?;
        Ok(Self { _temp: temp, root })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Write `contents` at `rel`, creating parent directories.
    pub fn write(&self, rel: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(())
    }

    /// `None` when the file does not exist.
    pub fn read(&self, rel: &str) -> anyhow::Result<Option<String>> {
        let path = self.root.join(rel);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }
}
