use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::Path;

impl Repository {
    /// Write the tree of `name` into `destination`, which must be absent or empty
    pub fn checkout(&self, name: &str, destination: &Path) -> anyhow::Result<()> {
        let oid = self.object_find(name, Some(ObjectType::Tree), true)?;
        let tree = self.database().object_read(&oid)?;

        let destination = std::path::absolute(destination)?;
        self.workspace().prepare_checkout_dir(&destination)?;
        self.workspace()
            .tree_checkout(self.database(), &tree, &destination)?;

        tracing::debug!(%oid, destination = %destination.display(), "checked out tree");

        Ok(())
    }
}
