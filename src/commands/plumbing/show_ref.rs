use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Print every loose ref under `refs/`, then every packed ref, as `<oid> <name>`
    pub fn show_ref(&self) -> anyhow::Result<()> {
        let refs = self.refs().ref_list(None)?;

        for (name, oid) in refs.flatten("refs") {
            writeln!(self.writer(), "{} {}", oid, name)?;
        }

        for (name, oid) in self.refs().packed_ref_list().iter() {
            writeln!(self.writer(), "{} {}", oid, name)?;
        }

        Ok(())
    }
}
