//! Command implementations
//!
//! This module contains all command implementations, organized into two categories
//! following Git's architecture:
//!
//! - `plumbing`: Low-level commands for direct object and ref access (cat-file, hash-object,
//!   ls-tree, show-ref)
//! - `porcelain`: User-facing commands (init, log, checkout, tag)
//!
//! Every command is a `Repository` method writing its output to the repository writer.

pub mod plumbing;
pub mod porcelain;
