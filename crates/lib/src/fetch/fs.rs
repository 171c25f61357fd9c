//! Filesystem store.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::trace;

use super::{Store, StoreError};

/// [`Store`] implementation writing straight to disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl Store for FsStore {
  fn create_dir_all(&self, path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path).map_err(|source| StoreError::CreateDir {
      path: path.to_path_buf(),
      source,
    })
  }

  fn store(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
      self.create_dir_all(parent)?;
    }

    let write_err = |source| StoreError::Write {
      path: path.to_path_buf(),
      source,
    };

    let mut file = File::create(path).map_err(write_err)?;
    file.write_all(bytes).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    trace!(path = ?path, size = bytes.len(), "stored");
    Ok(())
  }
}
