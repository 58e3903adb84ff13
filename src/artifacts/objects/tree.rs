//! Git tree object
//!
//! Trees represent directory snapshots. They list entries for files (blobs) and
//! subdirectories (other trees) along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! Entries are kept in the order they were parsed or pushed; no canonical sort is
//! applied on either side of the codec.

use crate::artifacts::objects::RAW_OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;
use bytes::Bytes;
use derive_new::new;
use std::io::Write;

/// Mode used by git for executable files
pub const EXECUTABLE_MODE: &str = "100755";

/// A single named entry of a tree
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    /// File mode as ASCII digits, e.g. `100644` or `40000`
    pub mode: String,
    pub path: String,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Check that `path` names a single child of the tree's directory
    ///
    /// Empty names, `.`, `..`, absolute paths and names containing `/` or NUL are rejected.
    pub fn check_path(&self) -> anyhow::Result<()> {
        let path = self.path.as_str();
        if path.is_empty()
            || path == "."
            || path == ".."
            || path.contains(['/', '\0'])
            || std::path::Path::new(path).is_absolute()
        {
            return Err(GitError::malformed("tree", format!("invalid entry path {path:?}")).into());
        }

        Ok(())
    }

    /// Parse the entry starting at `start`, returning it with the offset just past it
    fn parse_one(raw: &[u8], start: usize) -> anyhow::Result<(usize, TreeEntry)> {
        let space = raw[start..]
            .iter()
            .position(|&b| b == b' ')
            .map(|offset| start + offset)
            .ok_or_else(|| GitError::malformed("tree", format!("missing mode at {start}")))?;
        let nul = raw[space..]
            .iter()
            .position(|&b| b == b'\0')
            .map(|offset| space + offset)
            .ok_or_else(|| GitError::malformed("tree", format!("missing path at {space}")))?;

        let oid_end = nul + 1 + RAW_OBJECT_ID_LENGTH;
        if oid_end > raw.len() {
            return Err(
                GitError::malformed("tree", format!("truncated object id at {}", nul + 1)).into(),
            );
        }

        let mode = std::str::from_utf8(&raw[start..space])
            .map_err(|_| GitError::malformed("tree", "mode is not ASCII"))?;
        let path = std::str::from_utf8(&raw[space + 1..nul])
            .map_err(|_| GitError::malformed("tree", "path is not UTF-8"))?;
        let oid = ObjectId::from_raw(&raw[nul + 1..oid_end])?;

        let entry = TreeEntry::new(mode.to_string(), path.to_string(), oid);
        entry.check_path()?;

        Ok((oid_end, entry))
    }
}

/// Git tree object: an ordered list of entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse every entry of a raw tree payload
    pub fn parse_entries(raw: &[u8]) -> anyhow::Result<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        let mut cursor = 0;

        while cursor < raw.len() {
            let (next, entry) = TreeEntry::parse_one(raw, cursor)?;
            entries.push(entry);
            cursor = next;
        }

        Ok(entries)
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            write!(content, "{} {}", entry.mode, entry.path)?;
            content.push(0);
            entry.oid.write_h40_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(payload: Bytes) -> anyhow::Result<Self> {
        Ok(Tree::new(Self::parse_entries(&payload)?))
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
