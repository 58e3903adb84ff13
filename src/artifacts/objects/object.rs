use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;

/// Encode an object's payload (without the `<type> <size>\0` header)
pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

/// Decode an object's payload (the header has already been stripped)
pub trait Unpackable {
    fn deserialize(payload: Bytes) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Full on-disk representation: `<type> <size>\0<payload>`
    fn to_raw(&self) -> Result<Bytes> {
        let payload = self.serialize()?;
        let header = format!("{} {}\0", self.object_type().as_str(), payload.len());

        let mut raw = Vec::with_capacity(header.len() + payload.len());
        raw.extend_from_slice(header.as_bytes());
        raw.extend_from_slice(&payload);

        Ok(Bytes::from(raw))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::hash(&self.to_raw()?))
    }
}

/// Any object stored in the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectBox {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl ObjectBox {
    /// Build the variant matching `object_type` from a raw payload
    pub fn parse(object_type: ObjectType, payload: Bytes) -> Result<Self> {
        Ok(match object_type {
            ObjectType::Blob => ObjectBox::Blob(Blob::deserialize(payload)?),
            ObjectType::Tree => ObjectBox::Tree(Tree::deserialize(payload)?),
            ObjectType::Commit => ObjectBox::Commit(Commit::deserialize(payload)?),
            ObjectType::Tag => ObjectBox::Tag(Tag::deserialize(payload)?),
        })
    }
}

impl Packable for ObjectBox {
    fn serialize(&self) -> Result<Bytes> {
        match self {
            ObjectBox::Blob(blob) => blob.serialize(),
            ObjectBox::Tree(tree) => tree.serialize(),
            ObjectBox::Commit(commit) => commit.serialize(),
            ObjectBox::Tag(tag) => tag.serialize(),
        }
    }
}

impl Object for ObjectBox {
    fn object_type(&self) -> ObjectType {
        match self {
            ObjectBox::Blob(_) => ObjectType::Blob,
            ObjectBox::Tree(_) => ObjectType::Tree,
            ObjectBox::Commit(_) => ObjectType::Commit,
            ObjectBox::Tag(_) => ObjectType::Tag,
        }
    }
}
