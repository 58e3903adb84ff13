use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;

pub const REF_ALIASES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "@" => "HEAD",
};

/// Shortest hex prefix accepted as an abbreviated object ID
pub const MIN_ABBREV_LENGTH: usize = 4;

/// A user-supplied object name
///
/// Supported forms:
/// - Ref names: `HEAD`, `master`, `v1.0`, `refs/heads/main`, `heads/main`
/// - Aliases: `@` (resolves to `HEAD`)
/// - Full OIDs: 40 hexadecimal characters
/// - Abbreviated OIDs: 4-39 hexadecimal characters, unique in the object database
///
/// Refs win over OIDs when a name could be both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    name: String,
}

impl Revision {
    pub fn parse(name: &str) -> Self {
        let name = REF_ALIASES.get(name).copied().unwrap_or(name);

        Revision {
            name: name.to_string(),
        }
    }

    /// Resolve to the object ID the name designates, without peeling
    pub fn resolve(&self, repository: &Repository) -> anyhow::Result<ObjectId> {
        if let Some(oid) = repository.refs().resolve_short_name(&self.name)? {
            return Ok(oid);
        }

        if Self::looks_like_oid(&self.name) {
            Self::resolve_oid(&self.name, repository)
        } else {
            Err(GitError::RefNotFound(self.name.clone()).into())
        }
    }

    fn looks_like_oid(name: &str) -> bool {
        (MIN_ABBREV_LENGTH..=OBJECT_ID_LENGTH).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn resolve_oid(name: &str, repository: &Repository) -> anyhow::Result<ObjectId> {
        if name.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(name.to_string())?;
            return if repository.database().contains(&oid) {
                Ok(oid)
            } else {
                Err(GitError::ObjectNotFound(oid.to_string()).into())
            };
        }

        let mut matches = repository.database().find_objects_by_prefix(name)?;

        match matches.len() {
            0 => Err(GitError::ObjectNotFound(name.to_string()).into()),
            1 => Ok(matches.remove(0)),
            _ => Err(GitError::AmbiguousObjectName {
                name: name.to_string(),
                candidates: matches.iter().map(ObjectId::to_string).collect(),
            }
            .into()),
        }
    }

    /// Walk from `oid` to an object of type `wanted`
    ///
    /// With `follow`, tags are followed through their `object` header and commits through
    /// their `tree` header (when a tree is wanted).
    pub fn peel(
        repository: &Repository,
        oid: ObjectId,
        wanted: ObjectType,
        follow: bool,
    ) -> anyhow::Result<ObjectId> {
        let mut oid = oid;

        loop {
            let object = repository.database().object_read(&oid)?;
            let actual = object.object_type();
            if actual == wanted {
                return Ok(oid);
            }

            let next = match &object {
                ObjectBox::Tag(tag) if follow => tag.object_oid()?,
                ObjectBox::Commit(commit) if follow && wanted == ObjectType::Tree => {
                    commit.tree_oid()?
                }
                _ => None,
            };

            match next {
                Some(next) => {
                    tracing::debug!(from = %oid, to = %next, %actual, %wanted, "peeling object");
                    oid = next;
                }
                None => {
                    return Err(GitError::UnexpectedObjectType {
                        oid: oid.to_string(),
                        expected: wanted.to_string(),
                        actual: actual.to_string(),
                    }
                    .into());
                }
            }
        }
    }
}

impl Repository {
    /// Find the object designated by `name`, optionally peeled to `object_type`
    pub fn object_find(
        &self,
        name: &str,
        object_type: Option<ObjectType>,
        follow: bool,
    ) -> anyhow::Result<ObjectId> {
        let oid = Revision::parse(name).resolve(self)?;

        match object_type {
            Some(wanted) => Revision::peel(self, oid, wanted, follow),
            None => Ok(oid),
        }
    }
}
