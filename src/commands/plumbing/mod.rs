//! Plumbing commands (low-level operations)
//!
//! Plumbing commands provide direct access to the object database and the refs.
//! They're primarily used for scripting and as building blocks for porcelain commands.
//!
//! ## Commands
//!
//! - `cat-file`: Print the payload of an object
//! - `hash-object`: Compute object ID and optionally store in database
//! - `ls-tree`: List contents of a tree object
//! - `show-ref`: List loose and packed refs

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
pub mod show_ref;
