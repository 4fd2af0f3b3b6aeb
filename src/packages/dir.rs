// src/packages/dir.rs

//! Exploded directory-tree content packages
//!
//! Layout:
//!
//! ```text
//! <root>/package.toml     manifest: identity + dependencies
//! <root>/content/...      repository content entries
//! ```
//!
//! A directory under `content/` whose name ends in `.pkg` is an embedded
//! sub-package with the same layout; traversal yields it as a single
//! sub-package entry and does not descend into it.

use super::{ContentPackage, EntryKind, PackageDependency, PackageEntry, PackageIdentity};
use crate::error::{Error, Result};
use crate::version::PackageVersion;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the package manifest file
pub const MANIFEST_NAME: &str = "package.toml";

/// Name of the content subdirectory
pub const CONTENT_DIR: &str = "content";

/// Extension marking an embedded sub-package directory
const SUB_PACKAGE_SUFFIX: &str = ".pkg";

#[derive(Debug, Deserialize)]
struct Manifest {
    package: ManifestPackage,
}

#[derive(Debug, Deserialize)]
struct ManifestPackage {
    group: String,
    name: String,
    version: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

/// A content package backed by an exploded directory tree
#[derive(Debug)]
pub struct DirPackage {
    root: PathBuf,
    identity: PackageIdentity,
    dependencies: Vec<PackageDependency>,
}

impl DirPackage {
    /// Open a package directory, reading and validating its manifest
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_NAME);
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            Error::PackageRead(format!(
                "Cannot read manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;
        let manifest: Manifest = toml::from_str(&raw).map_err(|e| {
            Error::PackageRead(format!(
                "Invalid manifest {}: {}",
                manifest_path.display(),
                e
            ))
        })?;

        if manifest.package.group.is_empty() || manifest.package.name.is_empty() {
            return Err(Error::PackageRead(format!(
                "Manifest {} is missing group or name",
                manifest_path.display()
            )));
        }

        let identity = PackageIdentity::new(
            manifest.package.group,
            manifest.package.name,
            PackageVersion::parse(&manifest.package.version)?,
        );

        let mut dependencies = Vec::new();
        for dep in &manifest.package.dependencies {
            dependencies.push(PackageDependency::parse(dep)?);
        }

        Ok(Self {
            root,
            identity,
            dependencies,
        })
    }

    fn content_root(&self) -> PathBuf {
        self.root.join(CONTENT_DIR)
    }

    fn entry_path(path: &Path, content_root: &Path) -> String {
        let rel = path.strip_prefix(content_root).unwrap_or(path);
        let segments: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        segments.join("/")
    }
}

impl ContentPackage for DirPackage {
    fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    fn dependencies(&self) -> &[PackageDependency] {
        &self.dependencies
    }

    fn entries(&self) -> Result<Vec<PackageEntry>> {
        let content_root = self.content_root();
        if !content_root.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut walker = WalkDir::new(&content_root)
            .sort_by_file_name()
            .into_iter();
        while let Some(item) = walker.next() {
            let item = item.map_err(|e| {
                Error::PackageRead(format!("Failed to walk {}: {}", content_root.display(), e))
            })?;
            if item.depth() == 0 {
                continue;
            }
            let name = item.file_name().to_string_lossy();
            if item.file_type().is_dir() && name.ends_with(SUB_PACKAGE_SUFFIX) {
                entries.push(PackageEntry::sub_package(Self::entry_path(
                    item.path(),
                    &content_root,
                )));
                walker.skip_current_dir();
                continue;
            }
            if item.file_type().is_file() {
                entries.push(PackageEntry::file(Self::entry_path(
                    item.path(),
                    &content_root,
                )));
            }
        }
        Ok(entries)
    }

    fn read(&self, entry: &PackageEntry) -> Result<Vec<u8>> {
        if entry.kind != EntryKind::File {
            return Err(Error::PackageRead(format!(
                "Entry {} is not a readable file",
                entry.path
            )));
        }
        Ok(fs::read(self.content_root().join(&entry.path))?)
    }

    fn open_sub_package(&self, entry: &PackageEntry) -> Result<Box<dyn ContentPackage>> {
        if entry.kind != EntryKind::SubPackage {
            return Err(Error::PackageRead(format!(
                "Entry {} is not a sub-package",
                entry.path
            )));
        }
        let sub = DirPackage::open(self.content_root().join(&entry.path))?;
        Ok(Box::new(sub))
    }
}
