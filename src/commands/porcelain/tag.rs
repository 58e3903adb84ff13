use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::tag::Tag;
use crate::artifacts::tag_name::TagName;
use derive_new::new;
use std::io::Write;

#[derive(Debug, Clone, new)]
pub struct TagOptions {
    /// Create an annotated tag object instead of a plain ref
    pub annotate: bool,
    pub message: Option<String>,
}

impl Repository {
    /// Print tag names: loose ones under `refs/tags`, then packed ones
    pub fn list_tags(&self) -> anyhow::Result<()> {
        let tags_path = self.refs().tags_path();

        if tags_path.is_dir() {
            for (name, _) in self.refs().ref_list(Some(&tags_path))?.flatten("") {
                writeln!(self.writer(), "{}", name)?;
            }
        }

        for (name, _) in self.refs().packed_ref_list().iter() {
            if let Some(tag) = TagName::strip_ref_prefix(name) {
                writeln!(self.writer(), "{}", tag)?;
            }
        }

        Ok(())
    }

    /// Point `refs/tags/<name>` at `target`, through a tag object when annotating
    ///
    /// A message implies an annotated tag. Existing tags are never overwritten.
    pub fn create_tag(&self, name: &str, target: &str, opts: &TagOptions) -> anyhow::Result<()> {
        let tag_name = TagName::try_parse(name.to_string())?;
        if self.refs().ref_exists(&tag_name.ref_path()) {
            anyhow::bail!("tag {} already exists", tag_name);
        }

        let target_oid = self.object_find(target, None, true)?;

        let ref_oid = if opts.annotate || opts.message.is_some() {
            let target_type = self.database().object_type(&target_oid)?;
            let tagger = Author::load_from_env()?;
            let tag = Tag::annotate(
                &target_oid,
                target_type,
                tag_name.as_ref(),
                &tagger,
                opts.message.as_deref().unwrap_or_default(),
            );

            self.database().object_write(&tag, true)?
        } else {
            target_oid
        };

        self.refs().update_ref(&tag_name.ref_path(), &ref_oid)?;
        tracing::debug!(tag = %tag_name, oid = %ref_oid, "created tag");

        Ok(())
    }
}
