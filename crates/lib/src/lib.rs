//! pomfetch-lib: Maven manifest resolution and artifact download
//!
//! This crate provides the pieces used by the `pomfetch` binary:
//! - `pom`: XML document model for project manifests
//! - `manifest`: property, plugin and dependency resolution
//! - `artifact`: repository layout and artifact download
//! - `pipeline`: end-to-end runs over a manifest source

pub mod artifact;
pub mod config;
pub mod consts;
pub mod diagnostics;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod pipeline;
pub mod placeholder;
pub mod platform;
pub mod pom;
pub mod source;

pub use error::{Error, Result};
