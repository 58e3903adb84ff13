use crate::areas::database::Database;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::tree::{EXECUTABLE_MODE, Tree};
use crate::errors::GitError;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Read a file relative to the worktree (absolute paths are used as is)
    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    /// Make sure `destination` can receive a checkout: it must be absent or an empty directory
    pub fn prepare_checkout_dir(&self, destination: &Path) -> anyhow::Result<()> {
        let destination = self.path.join(destination);

        if !destination.exists() {
            std::fs::create_dir_all(&destination).with_context(|| {
                format!("Failed to create checkout directory: {:?}", destination)
            })?;
            return Ok(());
        }

        if !destination.is_dir() {
            return Err(GitError::PathNotDirectory(destination).into());
        }

        let mut entries = std::fs::read_dir(&destination)
            .with_context(|| format!("Failed to list directory: {:?}", destination))?;
        if entries.next().is_some() {
            return Err(GitError::PathNotEmpty(destination).into());
        }

        Ok(())
    }

    /// Write the content of a tree object below `destination`
    ///
    /// Anything but a tree is ignored. Subtrees become directories, blobs become new files;
    /// entries pointing at commits or tags are skipped. Entry names that would land outside
    /// their directory are rejected. A failing entry aborts the checkout and leaves whatever
    /// was already written in place.
    pub fn tree_checkout(
        &self,
        database: &Database,
        object: &ObjectBox,
        destination: &Path,
    ) -> anyhow::Result<()> {
        let ObjectBox::Tree(tree) = object else {
            tracing::debug!("nothing to check out: object is not a tree");
            return Ok(());
        };

        let mut pending: Vec<(Tree, PathBuf)> = vec![(tree.clone(), self.path.join(destination))];

        while let Some((tree, dir_path)) = pending.pop() {
            for entry in tree.entries() {
                entry.check_path()?;
                let target = dir_path.join(&entry.path);

                match database.object_read(&entry.oid)? {
                    ObjectBox::Tree(subtree) => {
                        std::fs::create_dir_all(&target)
                            .with_context(|| format!("Failed to create directory: {:?}", target))?;
                        pending.push((subtree, target));
                    }
                    ObjectBox::Blob(blob) => {
                        Self::write_new_file(&target, blob.content(), &entry.mode)?;
                    }
                    ObjectBox::Commit(_) | ObjectBox::Tag(_) => {
                        tracing::warn!(
                            path = %target.display(),
                            oid = %entry.oid,
                            "skipping tree entry that is neither a tree nor a blob"
                        );
                    }
                }
            }
        }

        Ok(())
    }

    fn write_new_file(path: &Path, data: &[u8], mode: &str) -> anyhow::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if mode == EXECUTABLE_MODE {
                std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
                    .with_context(|| format!("Failed to set permissions for file: {:?}", path))?;
            }
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }
}
