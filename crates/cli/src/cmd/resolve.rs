//! Resolve command implementation.
//!
//! Loads the manifest, resolves properties, plugins and dependencies, and
//! prints what was found. Nothing is downloaded besides the manifest itself.

use std::path::Path;

use anyhow::{Context, Result};

use pomfetch_lib::fetch::{FsStore, HttpFetcher};
use pomfetch_lib::manifest::ManifestResolution;
use pomfetch_lib::pipeline;

use super::{SourceArgs, load_config};
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_success, symbols};

pub fn cmd_resolve(config: Option<&Path>, source: &SourceArgs, verbose: bool, format: OutputFormat) -> Result<()> {
  let config = load_config(config, source)?;
  config.validate().context("Invalid configuration")?;
  let manifest = source.source(&config);
  let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;

  let report = pipeline::resolve(&manifest, &fetcher, &FsStore)?;

  if format.is_json() {
    print_json(&serde_json::json!({
      "source": report.source,
      "total": report.resolution.total(),
      "resolution": report.resolution,
    }))?;
  } else {
    print_success(&format!("Resolved {}", report.source));
    print_resolution(&report.resolution, verbose);
  }

  Ok(())
}

/// Print counts, then each plugin, dependency, exclusion and diagnostic.
pub(super) fn print_resolution(resolution: &ManifestResolution, verbose: bool) {
  print_stat("Properties", &resolution.properties.len().to_string());
  print_stat("Plugins", &resolution.plugins.len().to_string());
  print_stat(
    "Dependencies",
    &format!("{} of {} declared", resolution.dependencies.len(), resolution.declarations),
  );
  print_stat("Exclusions", &resolution.exclusions.len().to_string());
  print_stat("Total", &resolution.total().to_string());

  if verbose && !resolution.properties.is_empty() {
    println!();
    println!("Properties:");
    for (name, value) in resolution.properties.iter() {
      println!("  {} {} = {}", symbols::INFO, name, value);
    }
  }

  if !resolution.plugins.is_empty() {
    println!();
    println!("Plugins:");
    for plugin in &resolution.plugins {
      println!("  {} {}", symbols::INFO, plugin);
    }
  }

  if !resolution.dependencies.is_empty() {
    println!();
    println!("Dependencies:");
    for dependency in &resolution.dependencies {
      println!("  {} {}", symbols::INFO, dependency);
    }
  }

  if !resolution.exclusions.is_empty() {
    println!();
    println!("Exclusions:");
    for exclusion in &resolution.exclusions {
      println!("  {} {}", symbols::MINUS, exclusion.message);
    }
  }

  // Each diagnostic was already logged to stderr when it was recorded.
  println!();
  if resolution.diagnostics.is_empty() {
    print_info("No warnings");
  } else {
    println!("Warnings:");
    for diagnostic in &resolution.diagnostics {
      println!("  {} {}", symbols::WARNING, diagnostic);
    }
  }
}
