//! tinygit: a content-addressable object store replicating git's on-disk model
//!
//! - `areas`: repository layout, object database, refs and the checkout workspace
//! - `artifacts`: object model, codecs, config and ref trees
//! - `commands`: the operations exposed through the command line
//! - `errors`: typed error kinds raised by the core

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
