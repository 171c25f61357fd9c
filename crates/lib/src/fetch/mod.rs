//! Transport and storage capabilities.
//!
//! Resolution never touches the network or the filesystem directly. Manifest
//! download and artifact materialization go through the [`Fetch`] and
//! [`Store`] traits so they can be swapped out in tests.
//!
//! - [`HttpFetcher`] - blocking HTTP client
//! - [`FsStore`] - writes into the local filesystem

mod fs;
mod http;

pub use fs::FsStore;
pub use http::HttpFetcher;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from fetching a URL.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The HTTP client could not be built.
  #[error("failed to create HTTP client: {0}")]
  Client(String),

  /// The request did not complete.
  #[error("request to {url} failed: {message}")]
  Request { url: String, message: String },

  /// The server answered with a non-success status.
  #[error("{url} returned HTTP {status}")]
  Status { url: String, status: u16 },
}

/// Errors from writing fetched content.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to create directory '{}': {source}", .path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write '{}': {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Retrieve the body behind a URL.
pub trait Fetch {
  /// Fetch `url`, succeeding only on a success status.
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Persist fetched content.
pub trait Store {
  /// Create a directory and any missing parents.
  fn create_dir_all(&self, path: &Path) -> Result<(), StoreError>;

  /// Write `bytes` to `path`, creating parent directories as needed.
  fn store(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError>;
}
