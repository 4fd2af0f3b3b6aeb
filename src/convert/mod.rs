// src/convert/mod.rs

//! The conversion pipeline
//!
//! Converting runs in two passes. Pass 1 reads identity and dependency
//! declarations of every input package and linearizes them so dependencies
//! are converted before their dependents. Pass 2 walks each package's
//! entries through the entry handlers: consumed entries feed the
//! provisioning ledger, residual entries are assembled into the output
//! package, and embedded sub-packages recurse synchronously with their own
//! work buffer. When a top-level package (including all of its
//! sub-packages) is done, the assembled content is deployed, the ledger
//! synthesizes the initialization script into the manifest, and the
//! per-package ledger state is cleared.
//!
//! Conversion of one top-level package is not transactional: artifacts
//! already deployed stay on disk when a later step fails. The ledger and
//! work-buffer stack are always cleaned up before an error propagates.

pub mod assembler;
pub mod handler;

pub use assembler::Assembler;
pub use handler::{default_handlers, Disposition, EntryHandler};

use crate::acl::ProvisioningLedger;
use crate::config::{ConvertConfig, FailurePolicy};
use crate::deploy::Deployer;
use crate::error::Result;
use crate::manifest::ManifestSink;
use crate::nodetype::{DescriptorSource, NodeTypeResolver};
use crate::packages::{ContentPackage, EntryKind, PackageIdentity};
use crate::resolver;
use tracing::{debug, info, warn};

/// Outcome of a conversion run
#[derive(Debug, Default)]
pub struct ConvertReport {
    /// Identities converted successfully, in conversion order
    pub converted: Vec<PackageIdentity>,
    /// Identities that failed, with the error message (continue policy only)
    pub failed: Vec<(PackageIdentity, String)>,
}

/// Drives the two-pass conversion pipeline
pub struct Converter<'a> {
    config: &'a ConvertConfig,
    handlers: Vec<Box<dyn EntryHandler>>,
    types: NodeTypeResolver,
    ledger: ProvisioningLedger,
    manifest: &'a mut dyn ManifestSink,
    deployer: &'a mut dyn Deployer,
}

impl<'a> Converter<'a> {
    /// Create a converter with the built-in entry handlers
    pub fn new(
        config: &'a ConvertConfig,
        manifest: &'a mut dyn ManifestSink,
        deployer: &'a mut dyn Deployer,
    ) -> Self {
        Self {
            config,
            handlers: default_handlers(),
            types: NodeTypeResolver::new(config.default_node_type.clone()),
            ledger: ProvisioningLedger::new(),
            manifest,
            deployer,
        }
    }

    /// Replace the entry handler set
    pub fn with_handlers(mut self, handlers: Vec<Box<dyn EntryHandler>>) -> Self {
        self.handlers = handlers;
        self
    }

    /// Convert a set of packages in dependency order
    ///
    /// A dependency cycle fails the whole run before anything is converted.
    /// Failures of individual packages abort or continue according to the
    /// configured failure policy.
    pub fn convert(&mut self, packages: Vec<Box<dyn ContentPackage>>) -> Result<ConvertReport> {
        let ordered = resolver::order(packages)?;
        info!("Converting {} packages in dependency order", ordered.len());

        let mut report = ConvertReport::default();
        for package in &ordered {
            let identity = package.identity().clone();
            info!("Converting package {}", identity);
            match self.convert_top_level(package.as_ref()) {
                Ok(()) => report.converted.push(identity),
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Continue => {
                        warn!("Conversion of {} failed, continuing: {}", identity, e);
                        report.failed.push((identity, e.to_string()));
                    }
                },
            }
        }
        Ok(report)
    }

    /// Convert one top-level package and everything embedded in it
    fn convert_top_level(&mut self, package: &dyn ContentPackage) -> Result<()> {
        let mut completed: Vec<Assembler> = Vec::new();
        let result = self
            .convert_package(package, &mut completed)
            .and_then(|_| self.finish(&completed));
        // The scratch must never leak into the next top-level package,
        // whether this one succeeded or not; the work-buffer stack unwinds
        // with the call frames above.
        self.ledger.reset();
        result
    }

    /// Traverse a package into a fresh work buffer, recursing into
    /// sub-packages; the completed buffer is appended to `completed`
    fn convert_package(
        &mut self,
        package: &dyn ContentPackage,
        completed: &mut Vec<Assembler>,
    ) -> Result<()> {
        let mut assembler = Assembler::new(package.identity().clone());

        for entry in package.entries()? {
            match entry.kind {
                EntryKind::SubPackage => {
                    debug!("Descending into sub-package entry {}", entry.path);
                    let sub = package.open_sub_package(&entry)?;
                    // The child gets its own buffer; the parent's stays
                    // untouched on this frame until the recursion returns.
                    self.convert_package(sub.as_ref(), completed)?;
                }
                EntryKind::File => {
                    let content = package.read(&entry)?;
                    match self.classify(&entry.path, &content)? {
                        Disposition::Consumed => {}
                        Disposition::Residual => assembler.add_entry(&entry.path, content),
                    }
                }
            }
        }

        completed.push(assembler);
        Ok(())
    }

    /// Offer an entry to the handlers, first match wins
    fn classify(&mut self, entry_path: &str, content: &[u8]) -> Result<Disposition> {
        let Self {
            handlers, ledger, ..
        } = self;
        for handler in handlers.iter() {
            if handler.matches(entry_path) {
                return handler.handle(entry_path, content, ledger);
            }
        }
        Ok(Disposition::Residual)
    }

    /// Deploy assembled content and append the synthesized script
    fn finish(&mut self, completed: &[Assembler]) -> Result<()> {
        for assembler in completed {
            if assembler.is_empty() {
                debug!("Package {} has no residual content", assembler.identity());
                continue;
            }
            self.deployer.deploy(assembler)?;
        }

        // Most recently completed buffer first: the top-level package
        // completes last and is the most specific source for descriptor
        // lookups, ahead of its embedded sub-packages.
        let sources: Vec<&dyn DescriptorSource> = completed
            .iter()
            .rev()
            .map(|a| a as &dyn DescriptorSource)
            .collect();
        let script = self.ledger.synthesize(&self.types, &sources)?;
        if !script.is_empty() {
            self.manifest
                .append_init_script(&script, self.config.run_mode.as_deref())?;
        }
        Ok(())
    }
}
