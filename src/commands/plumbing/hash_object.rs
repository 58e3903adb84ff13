use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Print the ID `file` would have as an object of `object_type`, storing it if `write`
    pub fn hash_object(
        &self,
        file: &Path,
        object_type: ObjectType,
        write: bool,
    ) -> anyhow::Result<()> {
        let file = std::path::absolute(file)?;
        let data = self.workspace().read_file(&file)?;

        let object_id = self.database().object_hash(data, object_type, write)?;

        writeln!(self.writer(), "{}", object_id)?;

        Ok(())
    }
}
