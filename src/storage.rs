//! Raw object storage.
//!
//! Catalog rows carry an opaque locator; the store turns it into bytes on
//! disk. Locators are relative to the store root and may not escape it.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use mediavault_common::{Error, Result};

/// Byte storage addressed by catalog locators.
pub trait ObjectStore: Send + Sync {
    /// Read the full contents of an object.
    fn read_all(&self, locator: &str) -> Result<Vec<u8>>;

    /// Write a new object, creating parent directories as needed.
    ///
    /// Fails with [`Error::AlreadyExists`] if the locator is already taken;
    /// existing objects are never overwritten.
    fn write(&self, locator: &str, data: &[u8]) -> Result<()>;

    /// Remove an object.
    fn remove(&self, locator: &str) -> Result<()>;

    /// Filesystem path for tools that need one (video frame extraction).
    fn local_path(&self, locator: &str) -> Result<PathBuf>;
}

/// Filesystem-backed [`ObjectStore`] rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, locator: &str) -> Result<PathBuf> {
        let relative = Path::new(locator);
        let is_plain = !locator.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !is_plain {
            return Err(Error::invalid_input(format!(
                "storage locator must be a relative path inside the store: {:?}",
                locator
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FsStore {
    fn read_all(&self, locator: &str) -> Result<Vec<u8>> {
        let path = self.resolve(locator)?;
        Ok(std::fs::read(path)?)
    }

    fn write(&self, locator: &str, data: &[u8]) -> Result<()> {
        let path = self.resolve(locator)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::already_exists(locator));
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = file.write_all(data) {
            drop(file);
            let _ = std::fs::remove_file(&path);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove(&self, locator: &str) -> Result<()> {
        let path = self.resolve(locator)?;
        std::fs::remove_file(path)?;
        Ok(())
    }

    fn local_path(&self, locator: &str) -> Result<PathBuf> {
        self.resolve(locator)
    }
}
