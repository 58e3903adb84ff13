//! Core repository components
//!
//! This module contains the fundamental building blocks of a repository:
//!
//! - `database`: Object database for storing blobs, trees, commits and tags
//! - `refs`: Reference management (branches, HEAD, tags, packed refs)
//! - `repository`: Layout, discovery and coordination of the other areas
//! - `workspace`: Working directory file system operations (reading files, checkout)

pub mod database;
pub mod refs;
pub mod repository;
pub mod workspace;
