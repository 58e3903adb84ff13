//! Error kinds raised by the object store, the ref resolver and the checkout engine
//!
//! Core functions return `anyhow::Result` and raise these as typed values, so callers
//! can still match on the kind with `err.downcast_ref::<GitError>()`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("configuration file missing: {0}")]
    ConfigMissing(PathBuf),

    #[error("unsupported repositoryformatversion: {0}")]
    UnsupportedFormatVersion(String),

    #[error("not a directory: {0}")]
    PathNotDirectory(PathBuf),

    #[error("directory not empty: {0}")]
    PathNotEmpty(PathBuf),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("malformed {kind} object: {reason}")]
    MalformedObject { kind: &'static str, reason: String },

    #[error("compression failure: {0}")]
    CompressionFailure(String),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("symbolic ref cycle detected at {0}")]
    SymbolicRefCycle(String),

    #[error("ambiguous object name {name}: candidates are {}", candidates.join(", "))]
    AmbiguousObjectName { name: String, candidates: Vec<String> },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("object {oid} is a {actual}, expected a {expected}")]
    UnexpectedObjectType {
        oid: String,
        expected: String,
        actual: String,
    },
}

impl GitError {
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        GitError::MalformedObject {
            kind,
            reason: reason.into(),
        }
    }
}
