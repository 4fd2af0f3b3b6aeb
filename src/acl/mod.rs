// src/acl/mod.rs

//! System identities, access-control statements and the provisioning ledger
//!
//! Entry handlers feed discoveries into the [`ProvisioningLedger`] while
//! packages are scanned; once a top-level package has been fully traversed
//! the ledger synthesizes the initialization script that provisions
//! privileges, node types, paths, service users and access control in an
//! order the target interpreter can execute.

pub mod ledger;
pub mod statement;

pub use ledger::ProvisioningLedger;
pub use statement::{AclStatement, SystemUser};
