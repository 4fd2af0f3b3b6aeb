// src/commands.rs

//! Command implementations for the repoconv CLI.

use crate::config::{ConvertConfig, FailurePolicy};
use crate::convert::Converter;
use crate::deploy::FsDeployer;
use crate::error::Result;
use crate::manifest::JsonManifest;
use crate::packages::{ContentPackage, DirPackage};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the written deployment manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Convert the given package directories into the output directory
pub fn convert(
    packages: &[String],
    output: &str,
    config_path: Option<&str>,
    run_mode: Option<&str>,
    continue_on_error: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ConvertConfig::load(Path::new(path))?,
        None => ConvertConfig::default(),
    };

    // CLI flags override the config file
    config.output_dir = PathBuf::from(output);
    if let Some(run_mode) = run_mode {
        config.run_mode = Some(run_mode.to_string());
    }
    if continue_on_error {
        config.failure_policy = FailurePolicy::Continue;
    }

    let mut opened: Vec<Box<dyn ContentPackage>> = Vec::with_capacity(packages.len());
    for path in packages {
        opened.push(Box::new(DirPackage::open(path)?));
    }

    let mut manifest = JsonManifest::new();
    let mut deployer = FsDeployer::new(&config.output_dir);
    let report = {
        let mut converter = Converter::new(&config, &mut manifest, &mut deployer);
        converter.convert(opened)?
    };

    for identity in &report.converted {
        manifest.record_package(identity);
    }
    manifest.write_to(&config.output_dir.join(MANIFEST_FILE))?;

    info!(
        "Converted {} packages, {} failed",
        report.converted.len(),
        report.failed.len()
    );
    for (identity, reason) in &report.failed {
        warn!("{}: {}", identity, reason);
    }
    Ok(())
}
