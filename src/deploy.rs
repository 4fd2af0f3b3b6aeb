// src/deploy.rs

//! Artifact deployment boundary
//!
//! Assembled packages are handed to a [`Deployer`]; [`FsDeployer`] writes
//! each package's residual entries into a per-identity directory tree under
//! the configured output directory.

use crate::convert::Assembler;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Receives assembled packages for deployment
pub trait Deployer {
    fn deploy(&mut self, assembler: &Assembler) -> Result<()>;
}

/// Writes assembled content under `<output>/<group>/<name>/<version>/`
#[derive(Debug)]
pub struct FsDeployer {
    output_dir: PathBuf,
}

impl FsDeployer {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }
}

impl Deployer for FsDeployer {
    fn deploy(&mut self, assembler: &Assembler) -> Result<()> {
        let identity = assembler.identity();
        let base = self
            .output_dir
            .join(&identity.group)
            .join(&identity.name)
            .join(identity.version.to_string());

        for (path, content) in assembler.entries() {
            let target = base.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, content)?;
        }

        info!(
            "Deployed {} entries of {} to {}",
            assembler.len(),
            identity,
            base.display()
        );
        Ok(())
    }
}
