// src/acl/ledger.rs

//! Accumulation and synthesis of the initialization script
//!
//! The ledger lives for one conversion run and mixes two lifetimes, kept as
//! two explicit structs: [`SessionState`] survives across all top-level
//! packages of the run (the system-user registry and the emitted-line dedup
//! sets), while [`PackageScratch`] is cleared by [`ProvisioningLedger::reset`]
//! after each top-level package so unrelated packages cannot contaminate
//! each other.
//!
//! Synthesis order is fixed: privileges, raw node-type sentences, then per
//! active system user the intermediate path, the identity itself, the
//! ancestor closure of its ACL target paths, and the ACL block. Statements
//! owned by users registered in an earlier package follow at the end. The
//! output is byte-stable for a given input.

use super::statement::{AclStatement, SystemUser};
use crate::error::Result;
use crate::nodetype::{DescriptorSource, NodeTypeResolver, AUTHORIZABLE_FOLDER_TYPE};
use crate::repopath::RepoPath;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Session-long ledger state, never cleared during a run
#[derive(Debug, Default)]
pub struct SessionState {
    /// Every system user ever registered, in first-registered order
    registered: Vec<SystemUser>,
    /// Paths already created by an emitted `create path` line
    emitted_paths: HashSet<RepoPath>,
    /// Intermediate paths already created for system users
    emitted_intermediates: HashSet<RepoPath>,
}

impl SessionState {
    fn is_registered(&self, id: &str) -> bool {
        self.registered.iter().any(|u| u.id == id)
    }
}

/// Per-package ledger state, cleared between top-level packages
#[derive(Debug, Default)]
pub struct PackageScratch {
    /// Users registered while scanning the current package
    active: Vec<SystemUser>,
    /// Accumulated statements per owning user id, in insertion order
    acls: Vec<(String, Vec<AclStatement>)>,
    /// Raw node-type registration sentences, verbatim
    node_type_sentences: Vec<String>,
    /// Privilege names to register, first-seen order
    privileges: Vec<String>,
}

/// Accumulates provisioning facts and synthesizes the initialization script
#[derive(Debug, Default)]
pub struct ProvisioningLedger {
    session: SessionState,
    scratch: PackageScratch,
}

impl ProvisioningLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system user discovered in the current package
    ///
    /// Returns true if the id was not seen before in this session. A
    /// duplicate id is ignored entirely; the first registration wins.
    pub fn register_system_user(&mut self, user: SystemUser) -> bool {
        if self.session.is_registered(&user.id) {
            return false;
        }
        self.session.registered.push(user.clone());
        self.scratch.active.push(user);
        true
    }

    /// Record an access-control statement for a system user
    ///
    /// Returns true if the owning id was registered. A statement for an
    /// unknown identity models policy referencing a user nobody declared
    /// and is dropped rather than failing the conversion.
    pub fn add_access_control(&mut self, user_id: &str, statement: AclStatement) -> bool {
        if !self.session.is_registered(user_id) {
            debug!(
                "Dropping access-control statement for unregistered user {}: {}",
                user_id, statement
            );
            return false;
        }
        match self.scratch.acls.iter_mut().find(|(id, _)| id == user_id) {
            Some((_, statements)) => statements.push(statement),
            None => self
                .scratch
                .acls
                .push((user_id.to_string(), vec![statement])),
        }
        true
    }

    /// Record a privilege to register, deduplicated in first-seen order
    pub fn add_privilege(&mut self, name: &str) {
        if !self.scratch.privileges.iter().any(|p| p == name) {
            self.scratch.privileges.push(name.to_string());
        }
    }

    /// Record a raw node-type registration sentence, emitted verbatim
    pub fn add_node_type_sentence(&mut self, sentence: &str) {
        self.scratch.node_type_sentences.push(sentence.to_string());
    }

    /// Clear per-package state, keeping the session registry and dedup sets
    pub fn reset(&mut self) {
        self.scratch = PackageScratch::default();
    }

    /// Synthesize the initialization script for everything accumulated
    ///
    /// Returns the empty string when nothing was accumulated. Accumulated
    /// statements are consumed.
    pub fn synthesize(
        &mut self,
        types: &NodeTypeResolver,
        sources: &[&dyn DescriptorSource],
    ) -> Result<String> {
        let ProvisioningLedger { session, scratch } = self;
        let mut script = String::new();

        for privilege in &scratch.privileges {
            script.push_str(&format!("register privilege {}\n", privilege));
        }
        for sentence in &scratch.node_type_sentences {
            script.push_str(&format!("{}\n", sentence));
        }

        let mut acls = std::mem::take(&mut scratch.acls);

        for user in &scratch.active {
            if session
                .emitted_intermediates
                .insert(user.intermediate_path.clone())
            {
                script.push_str(&format!(
                    "create path ({}) {}\n",
                    AUTHORIZABLE_FOLDER_TYPE, user.intermediate_path
                ));
            }
            script.push_str(&format!(
                "create service user {} with path {}\n",
                user.id, user.intermediate_path
            ));

            let mut statements = take_statements(&mut acls, &user.id);
            // Rights below the user's own home come with the identity
            // creation; an explicit grant there would reference a path the
            // interpreter has not provisioned independently.
            statements.retain(|s| !s.path().starts_with(&user.intermediate_path));
            emit_statements(session, &user.id, &statements, types, sources, &mut script)?;
        }

        // Statements owned by users registered in an earlier package of the
        // same run; the identity lines were already emitted back then.
        for (id, statements) in &acls {
            emit_statements(session, id, statements, types, sources, &mut script)?;
        }

        Ok(script)
    }
}

fn take_statements(acls: &mut Vec<(String, Vec<AclStatement>)>, id: &str) -> Vec<AclStatement> {
    match acls.iter().position(|(owner, _)| owner == id) {
        Some(index) => acls.remove(index).1,
        None => Vec::new(),
    }
}

/// Emit the path closure and ACL block for one user's statements
fn emit_statements(
    session: &mut SessionState,
    id: &str,
    statements: &[AclStatement],
    types: &NodeTypeResolver,
    sources: &[&dyn DescriptorSource],
    script: &mut String,
) -> Result<()> {
    if statements.is_empty() {
        return Ok(());
    }

    // Every target path and all its ancestors must exist before the ACL
    // block references them; BTreeSet keeps the closure in path order.
    let mut closure = BTreeSet::new();
    for statement in statements {
        let mut current = Some(statement.path().clone());
        while let Some(path) = current {
            if path.is_root() {
                break;
            }
            current = path.parent();
            closure.insert(path);
        }
    }

    for path in closure {
        if session.emitted_paths.insert(path.clone()) {
            let node_type = types.resolve(&path, sources)?;
            script.push_str(&format!("create path ({}) {}\n", node_type, path));
        }
    }

    script.push_str(&format!("set ACL for {}\n", id));
    for statement in statements {
        script.push_str(&format!("{}\n", statement));
    }
    script.push_str("end\n");
    Ok(())
}
