use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::GitError;
use std::io::Write;

impl Repository {
    /// List the entries of the tree `name` resolves to
    ///
    /// One line per entry: `<mode padded to 6> <type> <oid>\t<path>`.
    pub fn ls_tree(&self, name: &str) -> anyhow::Result<()> {
        let oid = self.object_find(name, Some(ObjectType::Tree), true)?;

        let ObjectBox::Tree(tree) = self.database().object_read(&oid)? else {
            return Err(GitError::ObjectNotFound(name.to_string()).into());
        };

        for entry in tree.entries() {
            let entry_type = self.database().object_type(&entry.oid)?;

            writeln!(
                self.writer(),
                "{:0>6} {} {}\t{}",
                entry.mode,
                entry_type,
                entry.oid,
                entry.path
            )?;
        }

        Ok(())
    }
}
