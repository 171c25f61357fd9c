//! Error type for whole runs.

use thiserror::Error;

use crate::artifact::MaterializeError;
use crate::pom::ParseError;
use crate::source::SourceError;

/// Fatal errors of a run. Anything not listed here is reported as a diagnostic
/// instead. Config and HTTP client setup fail before a run starts.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Source(#[from] SourceError),

  #[error("failed to parse manifest: {0}")]
  Parse(#[from] ParseError),

  #[error(transparent)]
  Materialize(#[from] MaterializeError),
}

/// Result type for whole-run operations
pub type Result<T> = std::result::Result<T, Error>;
