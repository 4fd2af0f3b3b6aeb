// src/lib.rs

//! Repoconv Content-Package Converter
//!
//! Converts repository content packages into declarative deployment
//! artifacts: an ordered deployment plan, a synthesized initialization
//! script, and the assembled residual content.
//!
//! # Architecture
//!
//! - Two-pass pipeline: resolve package order first, then convert
//! - Dependencies are predicates, resolved once against the package set
//! - Entry handlers classify package content and feed the ledger
//! - The ledger synthesizes a deterministic, byte-stable script where no
//!   statement references an identity or path not yet created

pub mod acl;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convert;
pub mod deploy;
mod error;
pub mod manifest;
pub mod nodetype;
pub mod packages;
pub mod repopath;
pub mod resolver;
pub mod version;

pub use acl::{AclStatement, ProvisioningLedger, SystemUser};
pub use config::{ConvertConfig, FailurePolicy};
pub use convert::{Assembler, Converter, ConvertReport, Disposition, EntryHandler};
pub use deploy::{Deployer, FsDeployer};
pub use error::{Error, Result};
pub use manifest::{JsonManifest, ManifestSink};
pub use nodetype::{Descriptor, DescriptorSource, NodeType, NodeTypeResolver};
pub use packages::{
    ContentPackage, DirPackage, EntryKind, PackageDependency, PackageEntry, PackageIdentity,
};
pub use repopath::RepoPath;
pub use version::{PackageVersion, VersionRange};
