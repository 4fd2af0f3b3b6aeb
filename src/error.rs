// src/error.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

/// Errors surfaced by the conversion pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// The package dependency graph contains a cycle; no ordering exists
    #[error("Cyclic dependency detected involving package {0}")]
    CyclicDependency(String),

    /// A required identifier or path was absent where one is mandatory
    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    /// A content descriptor could not be parsed; content semantics are
    /// never guessed around, so this aborts the conversion
    #[error("Malformed content descriptor at {path}: {reason}")]
    DescriptorParse { path: String, reason: String },

    /// A package could not be opened or its metadata read
    #[error("Failed to read package: {0}")]
    PackageRead(String),

    /// A version or version range string could not be parsed
    #[error("Invalid version: {0}")]
    VersionParse(String),

    /// Invalid or unreadable conversion configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
