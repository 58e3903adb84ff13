//! Reference data structures
//!
//! - [`RefTree`]: the `refs/` directory as a tree of name segments
//! - [`PackedRefs`]: the flat `packed-refs` table

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

/// A node of a [`RefTree`]: either a resolved ref or a nested directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefNode {
    Ref(ObjectId),
    Tree(RefTree),
}

/// Hierarchical view of loose refs, keyed by name segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefTree {
    nodes: BTreeMap<String, RefNode>,
}

impl RefTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `oid` under the path formed by `segments`, creating subtrees on the way
    pub fn insert<S: AsRef<str>>(&mut self, segments: &[S], oid: ObjectId) {
        match segments {
            [] => {}
            [leaf] => {
                self.nodes
                    .insert(leaf.as_ref().to_string(), RefNode::Ref(oid));
            }
            [dir, rest @ ..] => {
                let node = self
                    .nodes
                    .entry(dir.as_ref().to_string())
                    .or_insert_with(|| RefNode::Tree(RefTree::new()));

                match node {
                    RefNode::Tree(subtree) => subtree.insert(rest, oid),
                    // a ref file and a directory cannot share a name on disk
                    RefNode::Ref(_) => {
                        let mut subtree = RefTree::new();
                        subtree.insert(rest, oid);
                        *node = RefNode::Tree(subtree);
                    }
                }
            }
        }
    }

    pub fn get(&self, segment: &str) -> Option<&RefNode> {
        self.nodes.get(segment)
    }

    pub fn subtree(&self, segment: &str) -> Option<&RefTree> {
        match self.nodes.get(segment) {
            Some(RefNode::Tree(tree)) => Some(tree),
            _ => None,
        }
    }

    /// Flatten into `(full name, oid)` pairs, walking each level in name order
    ///
    /// Names are joined with `/` and prefixed with `prefix` when it is not empty.
    pub fn flatten(&self, prefix: &str) -> Vec<(String, ObjectId)> {
        let mut refs = Vec::new();
        self.flatten_into(prefix, &mut refs);
        refs
    }

    fn flatten_into(&self, prefix: &str, refs: &mut Vec<(String, ObjectId)>) {
        for (name, node) in &self.nodes {
            let full_name = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}/{name}")
            };

            match node {
                RefNode::Ref(oid) => refs.push((full_name, oid.clone())),
                RefNode::Tree(subtree) => subtree.flatten_into(&full_name, refs),
            }
        }
    }
}

/// The `packed-refs` table: full ref name to object ID
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackedRefs {
    refs: BTreeMap<String, ObjectId>,
}

impl PackedRefs {
    /// Parse `<sha> <refname>` lines
    ///
    /// `#` lines (the `# pack-refs with:` header) and `^` lines (peeled tag targets)
    /// are skipped, as are lines that do not start with a valid object ID.
    pub fn parse(content: &str) -> Self {
        let refs = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('^'))
            .filter_map(|line| {
                let (oid, name) = line.split_once(' ')?;
                let oid = ObjectId::try_parse(oid.to_string()).ok()?;
                Some((name.trim().to_string(), oid))
            })
            .collect();

        PackedRefs { refs }
    }

    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.refs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.refs.iter()
    }
}
