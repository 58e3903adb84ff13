//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands compose plumbing commands and internal operations into workflows
//! that match typical Git usage patterns.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `log`: Show commit ancestry as a graph
//! - `checkout`: Materialize a commit's tree into an empty directory
//! - `tag`: List or create tags

pub mod checkout;
pub mod init;
pub mod log;
pub mod tag;
