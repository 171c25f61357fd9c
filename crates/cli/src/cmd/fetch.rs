//! Fetch command implementation.
//!
//! Resolves the manifest, then downloads every candidate file of every
//! accepted dependency into the download root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pomfetch_lib::fetch::{FsStore, HttpFetcher};
use pomfetch_lib::pipeline;

use super::resolve::print_resolution;
use super::{SourceArgs, load_config};
use crate::output::{
  OutputFormat, format_bytes, print_error, print_json, print_stat, print_success, print_warning, symbols,
};

pub fn cmd_fetch(
  config: Option<&Path>,
  source: &SourceArgs,
  repository: Option<String>,
  output: Option<PathBuf>,
  verbose: bool,
  format: OutputFormat,
) -> Result<()> {
  let mut config = load_config(config, source)?;
  if let Some(repository) = repository {
    config.repository_url = repository;
  }
  if let Some(output) = output {
    config.download_root = output;
  }
  config.validate().context("Invalid configuration")?;
  let manifest = source.source(&config);
  let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;

  let report = pipeline::fetch(
    &manifest,
    &config.repository_url,
    &config.download_root,
    &fetcher,
    &FsStore,
  )?;

  if format.is_json() {
    print_json(&report)?;
    return Ok(());
  }

  print_success(&format!("Resolved {}", report.source));
  print_resolution(&report.resolution, verbose);

  let Some(materialized) = &report.materialized else {
    return Ok(());
  };
  let bytes: u64 = materialized.stored.iter().map(|artifact| artifact.size as u64).sum();

  println!();
  print_success(&format!(
    "Stored {} files ({}) in {}",
    materialized.stored.len(),
    format_bytes(bytes),
    config.download_root.display()
  ));
  if materialized.duplicates > 0 {
    print_stat("Duplicates skipped", &materialized.duplicates.to_string());
  }

  if verbose {
    for artifact in &materialized.stored {
      println!(
        "  {} {}.{} {} {}",
        symbols::SUCCESS,
        artifact.coordinates,
        artifact.extension,
        symbols::ARROW,
        artifact.path.display()
      );
    }
  }

  if !materialized.failed.is_empty() {
    print_warning(&format!("{} files could not be fetched", materialized.failed.len()));
    if verbose {
      for failure in &materialized.failed {
        print_error(&format!(
          "{}.{}: {}",
          failure.coordinates, failure.extension, failure.reason
        ));
      }
    }
  }

  Ok(())
}
