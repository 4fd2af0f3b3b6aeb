// src/manifest.rs

//! Deployment manifest boundary
//!
//! The converter hands synthesized initialization scripts to a
//! [`ManifestSink`]; how the manifest is serialized is the sink's business.
//! [`JsonManifest`] is the file-based implementation used by the CLI:
//! scripts are grouped by run mode and written as pretty-printed JSON next
//! to the deployed artifacts.

use crate::error::Result;
use crate::packages::PackageIdentity;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// Key scripts are filed under when no run mode is set
pub const DEFAULT_RUN_MODE: &str = "default";

/// Receives synthesized initialization scripts
pub trait ManifestSink {
    /// Append one script block, optionally scoped to a run mode
    fn append_init_script(&mut self, text: &str, run_mode: Option<&str>) -> Result<()>;
}

/// JSON deployment manifest
#[derive(Debug, Default, Serialize)]
pub struct JsonManifest {
    /// Converted package identities in conversion order
    packages: Vec<String>,
    /// Script blocks grouped by run mode
    #[serde(rename = "init-scripts")]
    init_scripts: BTreeMap<String, Vec<String>>,
}

impl JsonManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully converted package
    pub fn record_package(&mut self, identity: &PackageIdentity) {
        self.packages.push(identity.to_string());
    }

    /// Script blocks accumulated for a run mode
    pub fn scripts_for(&self, run_mode: Option<&str>) -> &[String] {
        self.init_scripts
            .get(run_mode.unwrap_or(DEFAULT_RUN_MODE))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Write the manifest as pretty-printed JSON
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!("Wrote manifest to {}", path.display());
        Ok(())
    }
}

impl ManifestSink for JsonManifest {
    fn append_init_script(&mut self, text: &str, run_mode: Option<&str>) -> Result<()> {
        self.init_scripts
            .entry(run_mode.unwrap_or(DEFAULT_RUN_MODE).to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::PackageVersion;

    #[test]
    fn test_scripts_grouped_by_run_mode() {
        let mut manifest = JsonManifest::new();
        manifest.append_init_script("create path (sling:Folder) /a\n", None).unwrap();
        manifest
            .append_init_script("create path (sling:Folder) /b\n", Some("author"))
            .unwrap();

        assert_eq!(manifest.scripts_for(None).len(), 1);
        assert_eq!(manifest.scripts_for(Some("author")).len(), 1);
        assert!(manifest.scripts_for(Some("publish")).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut manifest = JsonManifest::new();
        manifest.record_package(&PackageIdentity::new(
            "com.example",
            "site",
            PackageVersion::parse("1.0").unwrap(),
        ));
        manifest.append_init_script("end\n", None).unwrap();

        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["packages"][0], "com.example:site:1.0");
        assert_eq!(json["init-scripts"]["default"][0], "end\n");
    }
}
