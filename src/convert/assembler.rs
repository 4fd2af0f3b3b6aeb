// src/convert/assembler.rs

//! Per-package work buffer for residual content
//!
//! Entries the classifiers do not consume are collected here, keyed by
//! their platform-form entry path. Completed assemblers double as
//! descriptor sources for node-type resolution: a descriptor for
//! repository path `/a/b` lives at entry `a/b/.content.toml`, with each
//! namespaced segment escaped to its platform form (`jcr:content` →
//! `_jcr_content`).

use crate::error::Result;
use crate::nodetype::{Descriptor, DescriptorSource};
use crate::packages::PackageIdentity;
use crate::repopath::RepoPath;
use std::collections::BTreeMap;

/// File name of a per-directory content descriptor
pub const DESCRIPTOR_NAME: &str = ".content.toml";

/// Escape one repository path segment to its platform form
pub fn platform_segment(segment: &str) -> String {
    match segment.split_once(':') {
        Some((namespace, name)) => format!("_{}_{}", namespace, name),
        None => segment.to_string(),
    }
}

/// The platform-form relative entry path for a repository path
pub fn platform_path(path: &RepoPath) -> String {
    path.segments()
        .iter()
        .map(|s| platform_segment(s))
        .collect::<Vec<_>>()
        .join("/")
}

/// Work buffer holding one package's residual entries
#[derive(Debug)]
pub struct Assembler {
    identity: PackageIdentity,
    /// Residual entries by platform path; BTreeMap keeps iteration stable
    entries: BTreeMap<String, Vec<u8>>,
}

impl Assembler {
    pub fn new(identity: PackageIdentity) -> Self {
        Self {
            identity,
            entries: BTreeMap::new(),
        }
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    /// Add a residual entry under its package-relative path
    pub fn add_entry(&mut self, path: &str, content: Vec<u8>) {
        self.entries.insert(path.to_string(), content);
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn descriptor_key(path: &RepoPath) -> String {
        let base = platform_path(path);
        if base.is_empty() {
            DESCRIPTOR_NAME.to_string()
        } else {
            format!("{}/{}", base, DESCRIPTOR_NAME)
        }
    }
}

impl DescriptorSource for Assembler {
    fn has_descriptor_at(&self, path: &RepoPath) -> bool {
        self.entries.contains_key(&Self::descriptor_key(path))
    }

    fn read_descriptor(&self, path: &RepoPath) -> Result<Descriptor> {
        match self.entries.get(&Self::descriptor_key(path)) {
            Some(raw) => Descriptor::parse(path, raw),
            None => Ok(Descriptor::default()),
        }
    }
}
