use anyhow::{Context, Result};
use log::trace;
use std::{fs, path::Path};

/// Synchronous access to the files being rewritten.
///
/// Resolution only ever reads through this; writes and removals happen in the
/// driver's later phases.
pub trait FileStore: Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    /// True only for regular files, never for directories
    fn is_file(&self, path: &Path) -> bool;
    fn remove(&self, path: &Path) -> Result<()>;
}

/// [`FileStore`] backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FileStore for FsStore {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        trace!("Reading {}", path.display());
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        trace!("Writing {}", path.display());
        fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        trace!("Removing {}", path.display());
        fs::remove_file(path).with_context(|| format!("Failed to delete {}", path.display()))
    }
}
