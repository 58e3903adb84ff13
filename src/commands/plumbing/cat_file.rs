use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    /// Print the serialized payload of `name`, peeled to `object_type`
    pub fn cat_file(&self, object_type: ObjectType, name: &str) -> anyhow::Result<()> {
        let oid = self.object_find(name, Some(object_type), true)?;
        let object = self.database().object_read(&oid)?;

        self.writer().write_all(&object.serialize()?)?;

        Ok(())
    }
}
