// src/acl/statement.rs

//! System-user and access-control value types.

use crate::error::{Error, Result};
use crate::repopath::RepoPath;
use std::fmt;

/// A non-interactive service principal declared by a package
///
/// The intermediate path is where the identity is provisioned in the
/// repository; the identity implicitly owns full rights below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemUser {
    pub id: String,
    pub intermediate_path: RepoPath,
}

impl SystemUser {
    /// Create a system user, rejecting empty ids and the path sentinel
    pub fn new(id: impl Into<String>, intermediate_path: RepoPath) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::UnresolvedReference(
                "system user id must not be empty".to_string(),
            ));
        }
        if intermediate_path.is_none() {
            return Err(Error::UnresolvedReference(format!(
                "system user {} has no intermediate path",
                id
            )));
        }
        Ok(Self {
            id,
            intermediate_path,
        })
    }
}

impl fmt::Display for SystemUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.intermediate_path)
    }
}

/// One allow/deny grant of privileges on a target path
///
/// Immutable once constructed apart from restriction accumulation while the
/// source policy entry is still being parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclStatement {
    allow: bool,
    privileges: String,
    path: RepoPath,
    restrictions: Vec<String>,
}

impl AclStatement {
    /// Create a statement, rejecting the path sentinel
    pub fn new(allow: bool, privileges: impl Into<String>, path: RepoPath) -> Result<Self> {
        if path.is_none() {
            return Err(Error::UnresolvedReference(
                "access-control statement has no target path".to_string(),
            ));
        }
        Ok(Self {
            allow,
            privileges: privileges.into(),
            path,
            restrictions: Vec::new(),
        })
    }

    /// Append a restriction discovered while parsing the policy entry
    pub fn add_restriction(&mut self, restriction: impl Into<String>) {
        self.restrictions.push(restriction.into());
    }

    pub fn path(&self) -> &RepoPath {
        &self.path
    }

    pub fn is_allow(&self) -> bool {
        self.allow
    }
}

impl fmt::Display for AclStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation = if self.allow { "allow" } else { "deny" };
        write!(f, "{} {} on {}", operation, self.privileges, self.path)?;
        if !self.restrictions.is_empty() {
            write!(f, " restriction({})", self.restrictions.join(","))?;
        }
        Ok(())
    }
}
