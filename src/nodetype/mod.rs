// src/nodetype/mod.rs

//! Node-type resolution for path-creation statements
//!
//! When the initialization script creates a repository path, the created
//! node needs a type. Content packages may carry a content descriptor for a
//! path declaring its primary type and mixins; the resolver consults the
//! candidate content sources in caller order and falls back to the generic
//! container type when nothing declares one. Source order is significant:
//! the most specific source must come first.

use crate::error::{Error, Result};
use crate::repopath::RepoPath;
use serde::Deserialize;
use std::fmt;

/// Generic container type used when no descriptor declares one
pub const DEFAULT_CONTAINER_TYPE: &str = "sling:Folder";

/// Node type created for system-user intermediate paths
pub const AUTHORIZABLE_FOLDER_TYPE: &str = "rep:AuthorizableFolder";

/// A parsed content descriptor for a repository path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Descriptor {
    /// Declared primary type, if any
    pub primary: Option<String>,
    /// Declared mixin type names
    pub mixins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    primary: Option<String>,
    #[serde(default)]
    mixins: String,
}

impl Descriptor {
    /// Parse a content descriptor
    ///
    /// Mixins are declared as one comma-separated string; entries are
    /// trimmed and empty entries dropped. A malformed descriptor is fatal
    /// and carries the repository path it was found at.
    pub fn parse(path: &RepoPath, raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw).map_err(|e| Error::DescriptorParse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let parsed: RawDescriptor = toml::from_str(text).map_err(|e| Error::DescriptorParse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        let mixins = parsed
            .mixins
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
            .collect();
        Ok(Self {
            primary: parsed.primary,
            mixins,
        })
    }
}

/// A resolved node type ready for a `create path` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeType {
    pub primary: String,
    pub mixins: Vec<String>,
}

impl NodeType {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            mixins: Vec::new(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary)?;
        if !self.mixins.is_empty() {
            write!(f, " mixin {}", self.mixins.join(","))?;
        }
        Ok(())
    }
}

/// Lookup boundary for content descriptors
///
/// Implemented by package assemblers; lookups use the platform-escaped form
/// of the repository path.
pub trait DescriptorSource {
    /// Whether a content descriptor exists for the path
    fn has_descriptor_at(&self, path: &RepoPath) -> bool;

    /// Read and parse the descriptor for the path
    fn read_descriptor(&self, path: &RepoPath) -> Result<Descriptor>;
}

/// Resolves the node type for a repository path from candidate sources
#[derive(Debug, Clone)]
pub struct NodeTypeResolver {
    default_primary: String,
}

impl NodeTypeResolver {
    pub fn new(default_primary: impl Into<String>) -> Self {
        Self {
            default_primary: default_primary.into(),
        }
    }

    /// Resolve the node type for `path`
    ///
    /// Sources are consulted in order; the first descriptor declaring a
    /// primary type wins. Without one the default container type applies.
    pub fn resolve(&self, path: &RepoPath, sources: &[&dyn DescriptorSource]) -> Result<NodeType> {
        for source in sources {
            if !source.has_descriptor_at(path) {
                continue;
            }
            let descriptor = source.read_descriptor(path)?;
            if let Some(primary) = descriptor.primary {
                return Ok(NodeType {
                    primary,
                    mixins: descriptor.mixins,
                });
            }
        }
        Ok(NodeType::new(self.default_primary.clone()))
    }
}

impl Default for NodeTypeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_TYPE)
    }
}
