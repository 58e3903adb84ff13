use crate::areas::repository::Repository;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitError;
use derive_new::new;
use std::collections::HashSet;

/// A visited commit together with its parents, in header order
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RevListEntry {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start: ObjectId,
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = anyhow::Result<RevListEntry>;
    type IntoIter = RevListIntoIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            repository: self.repository,
            pending: vec![self.start],
            seen: HashSet::new(),
        }
    }
}

pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    pending: Vec<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl RevListIntoIter<'_> {
    fn load_parents(&self, oid: &ObjectId) -> anyhow::Result<Vec<ObjectId>> {
        match self.repository.database().object_read(oid)? {
            ObjectBox::Commit(commit) => commit.parents(),
            other => Err(GitError::UnexpectedObjectType {
                oid: oid.to_string(),
                expected: "commit".to_string(),
                actual: other.object_type().to_string(),
            }
            .into()),
        }
    }
}

impl Iterator for RevListIntoIter<'_> {
    type Item = anyhow::Result<RevListEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(oid) = self.pending.pop() {
            if !self.seen.insert(oid.clone()) {
                continue;
            }

            return match self.load_parents(&oid) {
                Ok(parents) => {
                    // reversed so the first parent is walked first
                    self.pending.extend(parents.iter().rev().cloned());
                    Some(Ok(RevListEntry::new(oid, parents)))
                }
                Err(err) => {
                    self.pending.clear();
                    Some(Err(err))
                }
            };
        }

        None
    }
}
