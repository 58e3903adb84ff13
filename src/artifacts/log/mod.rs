//! Commit history traversal
//!
//! - `rev_list`: depth-first walk over commit ancestry, visiting every commit once
//!
//! Merge histories share ancestors, so the walk keeps a set of visited commits and an
//! explicit stack instead of recursing per parent.

pub mod rev_list;
