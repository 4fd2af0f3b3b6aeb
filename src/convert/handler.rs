// src/convert/handler.rs

//! Entry classification
//!
//! Each entry of a scanned package is offered to the registered handlers in
//! order; the first handler whose pattern matches decides what the entry
//! means. Entries no handler claims are residual content and stay in the
//! package being assembled.
//!
//! The built-in handlers cover the declarative entry formats that feed the
//! provisioning ledger:
//!
//! - `*.user.toml`: a system-user definition
//! - `*.policy.toml`: access-control policy entries
//! - `registrations.toml`: privilege and node-type registrations

use crate::acl::{AclStatement, ProvisioningLedger, SystemUser};
use crate::error::{Error, Result};
use crate::repopath::RepoPath;
use serde::Deserialize;
use tracing::debug;

/// What happened to a classified entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The handler consumed the entry; it does not appear in the output
    Consumed,
    /// The entry is ordinary content and belongs in the assembled package
    Residual,
}

/// One entry classifier
pub trait EntryHandler {
    /// Whether this handler is responsible for the entry path
    fn matches(&self, entry_path: &str) -> bool;

    /// Interpret the entry, feeding discoveries into the ledger
    fn handle(
        &self,
        entry_path: &str,
        content: &[u8],
        ledger: &mut ProvisioningLedger,
    ) -> Result<Disposition>;
}

/// The built-in handler set, most specific first
pub fn default_handlers() -> Vec<Box<dyn EntryHandler>> {
    vec![
        Box::new(SystemUserHandler),
        Box::new(PolicyHandler),
        Box::new(RegistrationHandler),
    ]
}

fn parse_toml<T: serde::de::DeserializeOwned>(entry_path: &str, text: &str) -> Result<T> {
    toml::from_str(text).map_err(|e| Error::DescriptorParse {
        path: format!("/{}", entry_path),
        reason: e.to_string(),
    })
}

fn entry_text<'a>(entry_path: &str, content: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(content).map_err(|e| Error::DescriptorParse {
        path: format!("/{}", entry_path),
        reason: e.to_string(),
    })
}

/// Handles `*.user.toml` system-user definitions
pub struct SystemUserHandler;

#[derive(Debug, Deserialize)]
struct UserDefinition {
    id: String,
    path: String,
}

impl EntryHandler for SystemUserHandler {
    fn matches(&self, entry_path: &str) -> bool {
        entry_path.ends_with(".user.toml")
    }

    fn handle(
        &self,
        entry_path: &str,
        content: &[u8],
        ledger: &mut ProvisioningLedger,
    ) -> Result<Disposition> {
        let definition: UserDefinition = parse_toml(entry_path, entry_text(entry_path, content)?)?;
        let user = SystemUser::new(definition.id, RepoPath::new(&definition.path))?;
        if !ledger.register_system_user(user) {
            debug!("System user in {} was already registered", entry_path);
        }
        Ok(Disposition::Consumed)
    }
}

/// Handles `*.policy.toml` access-control policy entries
pub struct PolicyHandler;

#[derive(Debug, Deserialize)]
struct PolicyFile {
    #[serde(default, rename = "entry")]
    entries: Vec<PolicyEntry>,
}

#[derive(Debug, Deserialize)]
struct PolicyEntry {
    user: String,
    allow: bool,
    #[serde(default)]
    privileges: String,
    path: String,
    #[serde(default)]
    restrictions: Vec<String>,
}

impl EntryHandler for PolicyHandler {
    fn matches(&self, entry_path: &str) -> bool {
        entry_path.ends_with(".policy.toml")
    }

    fn handle(
        &self,
        entry_path: &str,
        content: &[u8],
        ledger: &mut ProvisioningLedger,
    ) -> Result<Disposition> {
        let policy: PolicyFile = parse_toml(entry_path, entry_text(entry_path, content)?)?;
        for entry in policy.entries {
            let mut statement =
                AclStatement::new(entry.allow, entry.privileges, RepoPath::new(&entry.path))?;
            for restriction in entry.restrictions {
                statement.add_restriction(restriction);
            }
            ledger.add_access_control(&entry.user, statement);
        }
        Ok(Disposition::Consumed)
    }
}

/// Handles `registrations.toml` privilege and node-type registrations
pub struct RegistrationHandler;

#[derive(Debug, Deserialize)]
struct Registrations {
    #[serde(default)]
    privileges: Vec<String>,
    #[serde(default)]
    node_types: Vec<String>,
}

impl EntryHandler for RegistrationHandler {
    fn matches(&self, entry_path: &str) -> bool {
        entry_path
            .rsplit('/')
            .next()
            .is_some_and(|name| name == "registrations.toml")
    }

    fn handle(
        &self,
        entry_path: &str,
        content: &[u8],
        ledger: &mut ProvisioningLedger,
    ) -> Result<Disposition> {
        let registrations: Registrations =
            parse_toml(entry_path, entry_text(entry_path, content)?)?;
        for privilege in &registrations.privileges {
            ledger.add_privilege(privilege);
        }
        for sentence in &registrations.node_types {
            ledger.add_node_type_sentence(sentence);
        }
        Ok(Disposition::Consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodetype::NodeTypeResolver;

    fn synthesize(ledger: &mut ProvisioningLedger) -> String {
        ledger
            .synthesize(&NodeTypeResolver::default(), &[])
            .unwrap()
    }

    #[test]
    fn test_user_handler_registers() {
        let mut ledger = ProvisioningLedger::new();
        let handler = SystemUserHandler;
        assert!(handler.matches("apps/site/svc.user.toml"));

        let raw = b"id = \"svc-site\"\npath = \"/home/users/system/site\"\n";
        let disposition = handler
            .handle("apps/site/svc.user.toml", raw, &mut ledger)
            .unwrap();
        assert_eq!(disposition, Disposition::Consumed);
        assert!(synthesize(&mut ledger)
            .contains("create service user svc-site with path /home/users/system/site\n"));
    }

    #[test]
    fn test_user_handler_rejects_malformed() {
        let mut ledger = ProvisioningLedger::new();
        let result = SystemUserHandler.handle("a.user.toml", b"id = 42", &mut ledger);
        assert!(matches!(result, Err(Error::DescriptorParse { .. })));
    }

    #[test]
    fn test_policy_handler_accumulates_statements() {
        let mut ledger = ProvisioningLedger::new();
        SystemUserHandler
            .handle(
                "svc.user.toml",
                b"id = \"svc\"\npath = \"/home/svc\"\n",
                &mut ledger,
            )
            .unwrap();

        let raw = br#"
[[entry]]
user = "svc"
allow = true
privileges = "jcr:read"
path = "/content/site"
restrictions = ["rep:glob=/*"]

[[entry]]
user = "nobody"
allow = false
privileges = "jcr:all"
path = "/content"
"#;
        PolicyHandler
            .handle("acls.policy.toml", raw, &mut ledger)
            .unwrap();

        let script = synthesize(&mut ledger);
        assert!(script.contains("allow jcr:read on /content/site restriction(rep:glob=/*)\n"));
        // The entry for the undeclared user never surfaces
        assert!(!script.contains("nobody"));
        assert!(!script.contains("deny"));
    }

    #[test]
    fn test_registration_handler() {
        let mut ledger = ProvisioningLedger::new();
        let handler = RegistrationHandler;
        assert!(handler.matches("registrations.toml"));
        assert!(handler.matches("apps/registrations.toml"));
        assert!(!handler.matches("apps/other.toml"));

        let raw = b"privileges = [\"app:replicate\"]\nnode_types = [\"register nodetypes with app:Page\"]\n";
        handler
            .handle("registrations.toml", raw, &mut ledger)
            .unwrap();

        let script = synthesize(&mut ledger);
        assert!(script.starts_with(
            "register privilege app:replicate\nregister nodetypes with app:Page\n"
        ));
    }
}
