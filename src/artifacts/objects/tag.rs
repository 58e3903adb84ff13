//! Git annotated tag object
//!
//! Same key-value-list-with-message body as a commit, with different headers:
//!
//! ```text
//! object <sha>
//! type commit
//! tag v1.0
//! tagger <name> <email> <timestamp> <timezone>
//!
//! <tag message>
//! ```

use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::kvlm::Kvlm;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    pub fn new(kvlm: Kvlm) -> Self {
        Tag { kvlm }
    }

    /// Build an annotated tag pointing at `target`
    pub fn annotate(
        target: &ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &Author,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", target.as_ref());
        kvlm.push("type", target_type.as_str());
        kvlm.push("tag", name);
        kvlm.push("tagger", tagger.display());

        let mut message = message.to_string();
        if !message.ends_with('\n') {
            message.push('\n');
        }
        kvlm.set_message(message);

        Tag { kvlm }
    }

    pub fn get_value(&self, key: &str) -> Vec<String> {
        self.kvlm.get_value(key)
    }

    /// The tagged object
    pub fn object_oid(&self) -> anyhow::Result<Option<ObjectId>> {
        self.kvlm
            .get_value("object")
            .into_iter()
            .next()
            .map(ObjectId::try_parse)
            .transpose()
    }
}

impl Packable for Tag {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(self.kvlm.serialize())
    }
}

impl Unpackable for Tag {
    fn deserialize(payload: Bytes) -> anyhow::Result<Self> {
        Ok(Tag::new(Kvlm::parse(&payload)?))
    }
}

impl Object for Tag {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn annotated_tag_has_tag_headers() {
        let target =
            ObjectId::try_parse("206941306e8a8af65b66eaaaea388a7ae24d49a0".to_string()).unwrap();
        let timestamp = chrono::DateTime::parse_from_str(
            "2023-01-01 12:00:00 +0000",
            "%Y-%m-%d %H:%M:%S %z",
        )
        .unwrap();
        let tagger = Author::new_with_timestamp("A".into(), "a@x".into(), timestamp);

        let tag = Tag::annotate(&target, ObjectType::Commit, "v1.0", &tagger, "release");

        assert_eq!(
            tag.serialize().unwrap().as_ref(),
            b"object 206941306e8a8af65b66eaaaea388a7ae24d49a0\ntype commit\ntag v1.0\ntagger A <a@x> 1672574400 +0000\n\nrelease\n"
        );
        assert_eq!(tag.object_oid().unwrap(), Some(target));
        assert_eq!(tag.object_type(), ObjectType::Tag);
    }
}
