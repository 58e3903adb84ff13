use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::object_type::ObjectType;
use std::io::Write;

impl Repository {
    /// Print the ancestry of `name` as a Graphviz digraph, one edge per parent
    pub fn log(&self, name: &str) -> anyhow::Result<()> {
        let start = self.object_find(name, Some(ObjectType::Commit), true)?;

        writeln!(self.writer(), "digraph tinygitlog{{")?;

        for entry in RevList::new(self, start) {
            let entry = entry?;
            for parent in &entry.parents {
                writeln!(self.writer(), "c_{} -> c_{};", entry.oid, parent)?;
            }
        }

        writeln!(self.writer(), "}}")?;

        Ok(())
    }
}
