//! Data structures and algorithms
//!
//! - `config`: `.git/config` reader/writer
//! - `log`: Commit ancestry traversal
//! - `objects`: Object types (blob, tree, commit, tag) and their codecs
//! - `refs`: Ref tree and packed-ref table
//! - `revision`: Resolution of user-supplied object names
//! - `tag_name`: Tag name validation

pub mod config;
pub mod log;
pub mod objects;
pub mod refs;
pub mod revision;
pub mod tag_name;
