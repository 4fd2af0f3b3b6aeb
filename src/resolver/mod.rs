// src/resolver/mod.rs

//! Package ordering by declared dependencies
//!
//! Linearizes a set of content packages so that every package appears after
//! the packages it depends on, failing when the declared dependencies form a
//! cycle. Packages with no dependency relation keep their relative input
//! order, and the whole operation is deterministic for a given input order.

pub mod graph;

pub use graph::PackageGraph;

use crate::error::Result;
use crate::packages::ContentPackage;
use tracing::warn;

/// Order packages so that dependencies strictly precede dependents
///
/// Duplicate identities are dropped (first occurrence wins). Dependencies
/// that no package in the set satisfies are treated as externally provided.
pub fn order(packages: Vec<Box<dyn ContentPackage>>) -> Result<Vec<Box<dyn ContentPackage>>> {
    let mut unique: Vec<Box<dyn ContentPackage>> = Vec::with_capacity(packages.len());
    for package in packages {
        if unique
            .iter()
            .any(|p| p.identity() == package.identity())
        {
            warn!(
                "Duplicate package {} in input set, keeping the first",
                package.identity()
            );
            continue;
        }
        unique.push(package);
    }

    let nodes = unique
        .iter()
        .map(|p| (p.identity().clone(), p.dependencies().to_vec()))
        .collect();
    let sequence = PackageGraph::build(nodes).post_order()?;

    let mut slots: Vec<Option<Box<dyn ContentPackage>>> = unique.into_iter().map(Some).collect();
    let ordered = sequence
        .into_iter()
        .map(|i| slots[i].take().expect("post_order yields each node once"))
        .collect();
    Ok(ordered)
}
