// src/packages/mod.rs

//! Content-package model and container boundary
//!
//! A content package bundles hierarchical repository content together with a
//! manifest naming the package identity and its dependencies on other
//! packages. The container format itself stays behind the [`ContentPackage`]
//! trait; [`DirPackage`] reads the exploded directory layout used by the CLI
//! and the test suite.

pub mod dir;

pub use dir::DirPackage;

use crate::error::{Error, Result};
use crate::version::{PackageVersion, VersionRange};
use std::fmt;

/// Identity of a content package: group, name and version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity {
    pub group: String,
    pub name: String,
    pub version: PackageVersion,
}

impl PackageIdentity {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: PackageVersion) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version,
        }
    }

    /// Parse an identity from `group:name:version` form
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), Some(version)) if !group.is_empty() && !name.is_empty() => {
                Ok(Self::new(group, name, PackageVersion::parse(version)?))
            }
            _ => Err(Error::PackageRead(format!(
                "Invalid package identity '{}', expected group:name:version",
                s
            ))),
        }
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// A declared dependency on another content package
///
/// The dependency names a group and package and optionally constrains the
/// version; it is matched against candidate package identities, not resolved
/// to a concrete instance up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDependency {
    pub group: String,
    pub name: String,
    pub range: Option<VersionRange>,
}

impl PackageDependency {
    pub fn new(group: impl Into<String>, name: impl Into<String>, range: Option<VersionRange>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            range,
        }
    }

    /// Parse a dependency from `group:name[:range]` form
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(name), range) if !group.is_empty() && !name.is_empty() => {
                let range = match range {
                    Some(r) => Some(VersionRange::parse(r)?),
                    None => None,
                };
                Ok(Self::new(group, name, range))
            }
            _ => Err(Error::PackageRead(format!(
                "Invalid package dependency '{}', expected group:name[:range]",
                s
            ))),
        }
    }

    /// Check whether a candidate package identity satisfies this dependency
    pub fn matches(&self, candidate: &PackageIdentity) -> bool {
        if self.group != candidate.group || self.name != candidate.name {
            return false;
        }
        match &self.range {
            Some(range) => range.contains(&candidate.version),
            None => true,
        }
    }
}

impl fmt::Display for PackageDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)?;
        if let Some(ref range) = self.range {
            write!(f, ":{}", range)?;
        }
        Ok(())
    }
}

/// What a package entry is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular content file
    File,
    /// An embedded sub-package to be converted recursively
    SubPackage,
}

/// One entry inside a content package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    /// Entry path relative to the package content root, slash-delimited
    pub path: String,
    pub kind: EntryKind,
}

impl PackageEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn sub_package(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::SubPackage,
        }
    }
}

/// Common interface for content-package containers
///
/// Implementations open one package and expose its identity, declared
/// dependencies and entries. Entry iteration order must be deterministic for
/// a given package.
pub trait ContentPackage {
    /// The package identity from the manifest
    fn identity(&self) -> &PackageIdentity;

    /// Declared dependencies on other content packages
    fn dependencies(&self) -> &[PackageDependency];

    /// List all entries in deterministic order
    fn entries(&self) -> Result<Vec<PackageEntry>>;

    /// Read the content of a file entry
    fn read(&self, entry: &PackageEntry) -> Result<Vec<u8>>;

    /// Open an embedded sub-package entry as a package of its own
    fn open_sub_package(&self, entry: &PackageEntry) -> Result<Box<dyn ContentPackage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_parse() {
        let id = PackageIdentity::parse("com.example:site:1.2.0").unwrap();
        assert_eq!(id.group, "com.example");
        assert_eq!(id.name, "site");
        assert_eq!(id.version, PackageVersion::parse("1.2.0").unwrap());
        assert_eq!(id.to_string(), "com.example:site:1.2.0");
    }

    #[test]
    fn test_identity_parse_errors() {
        assert!(PackageIdentity::parse("only-name").is_err());
        assert!(PackageIdentity::parse(":site:1.0").is_err());
        assert!(PackageIdentity::parse("g:n:not-a-version").is_err());
    }

    #[test]
    fn test_dependency_matches_name_and_group() {
        let dep = PackageDependency::parse("com.example:base").unwrap();
        let id = PackageIdentity::parse("com.example:base:3.1.4").unwrap();
        assert!(dep.matches(&id));

        let other = PackageIdentity::parse("com.example:other:3.1.4").unwrap();
        assert!(!dep.matches(&other));
    }

    #[test]
    fn test_dependency_matches_range() {
        let dep = PackageDependency::parse("com.example:base:[1.0,2.0)").unwrap();
        assert!(dep.matches(&PackageIdentity::parse("com.example:base:1.5").unwrap()));
        assert!(!dep.matches(&PackageIdentity::parse("com.example:base:2.0").unwrap()));
    }
}
