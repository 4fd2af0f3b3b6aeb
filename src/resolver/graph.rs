// src/resolver/graph.rs

//! Dependency graph construction and post-order traversal
//!
//! Dependencies are declared as match predicates (group/name plus optional
//! version range), not as concrete package references. The graph resolves
//! every predicate once against the finalized node set: the first node in
//! input order whose identity satisfies the predicate becomes the edge
//! target, and a predicate no node satisfies is an external dependency and
//! produces no edge. Traversal is then a plain depth-first post-order walk
//! with cycle detection on the static graph.

use crate::error::{Error, Result};
use crate::packages::{PackageDependency, PackageIdentity};
use tracing::debug;

/// A static, fully resolved package dependency graph
#[derive(Debug)]
pub struct PackageGraph {
    /// Node identities in input order
    identities: Vec<PackageIdentity>,
    /// Resolved dependency targets per node, in declaration order
    edges: Vec<Vec<usize>>,
}

impl PackageGraph {
    /// Build a graph from packages and their declared dependencies
    ///
    /// `nodes` must already be deduplicated by identity; input order is
    /// significant and decides both edge tie-breaks and traversal order.
    pub fn build(nodes: Vec<(PackageIdentity, Vec<PackageDependency>)>) -> Self {
        let identities: Vec<PackageIdentity> = nodes.iter().map(|(id, _)| id.clone()).collect();
        let mut edges = Vec::with_capacity(nodes.len());

        for (identity, dependencies) in &nodes {
            let mut targets = Vec::new();
            for dependency in dependencies {
                match identities.iter().position(|c| dependency.matches(c)) {
                    Some(target) => targets.push(target),
                    None => {
                        // No candidate in the input set: satisfied externally
                        debug!(
                            "Dependency {} of {} is not in the package set, skipping",
                            dependency, identity
                        );
                    }
                }
            }
            edges.push(targets);
        }

        Self { identities, edges }
    }

    /// Number of nodes in the graph
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// The resolved edge targets of a node
    pub fn edge_targets(&self, node: usize) -> &[usize] {
        &self.edges[node]
    }

    /// Depth-first post-order over all nodes in input order
    ///
    /// Returns node indices such that every dependency precedes its
    /// dependents; nodes with no relation keep their relative input order.
    /// Fails with [`Error::CyclicDependency`] when a node is re-entered
    /// while still on the traversal stack, naming that node's identity.
    pub fn post_order(&self) -> Result<Vec<usize>> {
        let mut result = Vec::with_capacity(self.identities.len());
        let mut completed = vec![false; self.identities.len()];
        let mut visiting = vec![false; self.identities.len()];

        for node in 0..self.identities.len() {
            self.visit(node, &mut visiting, &mut completed, &mut result)?;
        }

        Ok(result)
    }

    fn visit(
        &self,
        node: usize,
        visiting: &mut [bool],
        completed: &mut [bool],
        result: &mut Vec<usize>,
    ) -> Result<()> {
        if completed[node] {
            return Ok(());
        }
        if visiting[node] {
            return Err(Error::CyclicDependency(self.identities[node].to_string()));
        }

        visiting[node] = true;
        for &target in &self.edges[node] {
            self.visit(target, visiting, completed, result)?;
        }
        visiting[node] = false;

        completed[node] = true;
        result.push(node);
        Ok(())
    }
}
