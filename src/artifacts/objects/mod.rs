//! Git object types and codecs
//!
//! Every object is identified by the SHA-1 hash of its on-disk form
//! `<type> <size>\0<content>`. There are four kinds:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (modes, names and object IDs)
//! - **Commit**: snapshot with metadata (tree, parents, author, message)
//! - **Tag**: annotated pointer to another object
//!
//! Commits and tags share the key-value-list-with-message body implemented in `kvlm`.

pub mod blob;
pub mod commit;
pub mod kvlm;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tag;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of a SHA-1 hash in raw bytes
pub const RAW_OBJECT_ID_LENGTH: usize = 20;
