//! Git references (branches, HEAD, tags)
//!
//! References are human-readable names pointing to objects. They can be:
//! - Direct: a file containing a 40-character SHA-1 hash
//! - Symbolic: a file containing `ref: <path>`, pointing at another reference
//! - Packed: a `<sha> <name>` line of `.git/packed-refs`
//!
//! The packed table is read once, when the repository is opened, and takes precedence
//! over loose files of the same name.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::refs::{PackedRefs, RefTree};
use crate::errors::GitError;
use anyhow::Context;
use file_guard::Lock;
use std::collections::HashSet;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Directories searched, in order, when looking up a short ref name
pub const REF_SEARCH_PREFIXES: [&str; 4] = ["", "refs/", "refs/tags/", "refs/heads/"];

/// Content of a loose ref file
#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef(String),
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read(path: &Path) -> anyhow::Result<SymRefOrOid> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ref file at {:?}", path))?;
        let line = content.strip_suffix('\n').unwrap_or(&content);

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(line);
        if let Some(symref_match) = symref_match {
            Ok(SymRefOrOid::SymRef(symref_match[1].to_string()))
        } else {
            ObjectId::try_parse(line.to_string())
                .map(SymRefOrOid::Oid)
                .with_context(|| format!("invalid ref file at {:?}", path))
        }
    }
}

/// Git references manager
#[derive(Debug)]
pub struct Refs {
    /// Path to the metadata directory (typically `.git`)
    path: Box<Path>,
    /// Snapshot of `packed-refs` taken at open time
    packed: PackedRefs,
}

impl Refs {
    /// Create a manager for `path`, loading `packed-refs` if it exists
    pub fn new(path: Box<Path>) -> anyhow::Result<Self> {
        let packed_refs_path = path.join("packed-refs");

        let packed = if packed_refs_path.is_file() {
            let content = std::fs::read_to_string(&packed_refs_path).with_context(|| {
                format!("failed to read packed refs at {:?}", packed_refs_path)
            })?;
            PackedRefs::parse(&content)
        } else {
            PackedRefs::default()
        };

        Ok(Refs { path, packed })
    }

    /// The flat packed-ref table as loaded when the repository was opened
    pub fn packed_ref_list(&self) -> &PackedRefs {
        &self.packed
    }

    /// Resolve a ref name (or ref file path) to the object it ultimately points to
    ///
    /// Packed entries win over loose files. Symbolic indirection is followed until a
    /// direct ID is found; revisiting a ref fails with `SymbolicRefCycle`.
    pub fn ref_resolve(&self, name: &str) -> anyhow::Result<ObjectId> {
        let mut current = name.to_string();
        let mut seen = HashSet::new();

        loop {
            if !seen.insert(current.clone()) {
                return Err(GitError::SymbolicRefCycle(current).into());
            }

            if let Some(oid) = self.packed.get(&current) {
                tracing::debug!(name = %current, %oid, "resolved packed ref");
                return Ok(oid.clone());
            }

            let path = self
                .locate(&current)
                .ok_or_else(|| GitError::RefNotFound(current.clone()))?;

            match SymRefOrOid::read(&path)? {
                SymRefOrOid::SymRef(target) => {
                    tracing::debug!(name = %current, %target, "following symbolic ref");
                    current = target;
                }
                SymRefOrOid::Oid(oid) => {
                    tracing::debug!(name = %current, %oid, "resolved loose ref");
                    return Ok(oid);
                }
            }
        }
    }

    /// Resolve a short name by trying `name`, `refs/name`, `refs/tags/name`, `refs/heads/name`
    ///
    /// Only refs inside the metadata directory (or packed) are candidates.
    pub fn resolve_short_name(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        REF_SEARCH_PREFIXES
            .iter()
            .map(|prefix| format!("{prefix}{name}"))
            .find(|candidate| self.ref_exists(candidate))
            .map(|candidate| self.ref_resolve(&candidate))
            .transpose()
    }

    /// Look for a ref file relative to the metadata directory, then as a plain path
    fn locate(&self, name: &str) -> Option<PathBuf> {
        [self.path.join(name), PathBuf::from(name)]
            .into_iter()
            .find(|path| path.is_file())
    }

    /// Build the tree of loose refs below `path` (default: `.git/refs`)
    ///
    /// Directories without any ref file are left out.
    pub fn ref_list(&self, path: Option<&Path>) -> anyhow::Result<RefTree> {
        let root = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.refs_path().to_path_buf());
        let mut tree = RefTree::new();

        for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to list refs in {:?}", root))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry.path().strip_prefix(&root)?;
            let segments = relative_path
                .components()
                .map(|component| component.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<_>>();
            let oid = self.ref_resolve(&entry.path().to_string_lossy())?;

            tree.insert(&segments, oid);
        }

        Ok(tree)
    }

    /// Point the loose ref `name` directly at `oid`
    pub fn update_ref(&self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(self.path.join(name).into_boxed_path(), format!("{oid}\n"))
    }

    /// Point the loose ref `name` at another ref
    pub fn update_symref(&self, name: &str, target: &str) -> anyhow::Result<()> {
        self.update_ref_file(
            self.path.join(name).into_boxed_path(),
            format!("ref: {target}\n"),
        )
    }

    fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(raw_ref.as_bytes())?;

        Ok(())
    }

    pub fn ref_exists(&self, name: &str) -> bool {
        self.packed.get(name).is_some() || self.path.join(name).is_file()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::refs::RefNode;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    const MAIN_OID: &str = "206941306e8a8af65b66eaaaea388a7ae24d49a0";
    const PACKED_OID: &str = "29ff16c9c14e2652b22f8b78bb08a5a07930c147";

    #[fixture]
    fn git_dir() -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        std::fs::create_dir_all(dir.path().join("refs").join("heads")).unwrap();
        std::fs::create_dir_all(dir.path().join("refs").join("tags")).unwrap();
        dir
    }

    fn write(dir: &TempDir, name: &str, content: &str) {
        let path = dir.path().join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn refs(dir: &TempDir) -> Refs {
        Refs::new(dir.path().to_path_buf().into_boxed_path()).unwrap()
    }

    fn oid(hex: &str) -> ObjectId {
        ObjectId::try_parse(hex.to_string()).unwrap()
    }

    #[rstest]
    fn resolves_through_one_symbolic_level(git_dir: TempDir) {
        write(&git_dir, "refs/heads/master", "ref: refs/heads/main\n");
        write(&git_dir, "refs/heads/main", &format!("{MAIN_OID}\n"));

        assert_eq!(refs(&git_dir).ref_resolve("refs/heads/master").unwrap(), oid(MAIN_OID));
    }

    #[rstest]
    fn resolves_head_chain(git_dir: TempDir) {
        write(&git_dir, "HEAD", "ref: refs/heads/master\n");
        write(&git_dir, "refs/heads/master", "ref: refs/heads/main\n");
        write(&git_dir, "refs/heads/main", MAIN_OID);

        assert_eq!(refs(&git_dir).ref_resolve("HEAD").unwrap(), oid(MAIN_OID));
    }

    #[rstest]
    fn packed_entry_takes_precedence_over_loose_file(git_dir: TempDir) {
        write(&git_dir, "refs/heads/main", &format!("{MAIN_OID}\n"));
        write(
            &git_dir,
            "packed-refs",
            &format!("# pack-refs with: peeled\n{PACKED_OID} refs/heads/main\n"),
        );

        let refs = refs(&git_dir);
        assert_eq!(refs.ref_resolve("refs/heads/main").unwrap(), oid(PACKED_OID));
        assert_eq!(
            refs.packed_ref_list().get("refs/heads/main"),
            Some(&oid(PACKED_OID))
        );
    }

    #[rstest]
    fn symbolic_ref_can_land_on_packed_entry(git_dir: TempDir) {
        write(&git_dir, "HEAD", "ref: refs/heads/main\n");
        write(&git_dir, "packed-refs", &format!("{PACKED_OID} refs/heads/main\n"));

        assert_eq!(refs(&git_dir).ref_resolve("HEAD").unwrap(), oid(PACKED_OID));
    }

    #[rstest]
    fn missing_ref_is_not_found(git_dir: TempDir) {
        let err = refs(&git_dir).ref_resolve("refs/heads/nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitError>(),
            Some(GitError::RefNotFound(_))
        ));
    }

    #[rstest]
    fn dangling_symbolic_ref_is_not_found(git_dir: TempDir) {
        write(&git_dir, "HEAD", "ref: refs/heads/master\n");

        let err = refs(&git_dir).ref_resolve("HEAD").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitError>(),
            Some(GitError::RefNotFound(name)) if name == "refs/heads/master"
        ));
    }

    #[rstest]
    fn symbolic_cycle_is_detected(git_dir: TempDir) {
        write(&git_dir, "refs/heads/a", "ref: refs/heads/b\n");
        write(&git_dir, "refs/heads/b", "ref: refs/heads/a\n");

        let err = refs(&git_dir).ref_resolve("refs/heads/a").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GitError>(),
            Some(GitError::SymbolicRefCycle(_))
        ));
    }

    #[rstest]
    fn resolves_short_names(git_dir: TempDir) {
        write(&git_dir, "refs/tags/v1", MAIN_OID);
        write(&git_dir, "refs/heads/dev", PACKED_OID);

        let refs = refs(&git_dir);
        assert_eq!(refs.resolve_short_name("v1").unwrap(), Some(oid(MAIN_OID)));
        assert_eq!(refs.resolve_short_name("dev").unwrap(), Some(oid(PACKED_OID)));
        assert_eq!(refs.resolve_short_name("nope").unwrap(), None);
    }

    #[rstest]
    fn lists_refs_hierarchically_omitting_empty_dirs(git_dir: TempDir) {
        write(&git_dir, "refs/heads/main", MAIN_OID);
        write(&git_dir, "refs/heads/feature/x", "ref: refs/heads/main\n");
        write(&git_dir, "refs/tags/v1", PACKED_OID);
        std::fs::create_dir_all(git_dir.path().join("refs").join("remotes")).unwrap();

        let tree = refs(&git_dir).ref_list(None).unwrap();

        assert!(tree.get("remotes").is_none());
        let heads = tree.subtree("heads").unwrap();
        assert_eq!(heads.get("main"), Some(&RefNode::Ref(oid(MAIN_OID))));
        assert_eq!(
            heads.subtree("feature").unwrap().get("x"),
            Some(&RefNode::Ref(oid(MAIN_OID)))
        );
        assert_eq!(
            tree.flatten("refs")
                .into_iter()
                .map(|(name, _)| name)
                .collect::<Vec<_>>(),
            vec!["refs/heads/feature/x", "refs/heads/main", "refs/tags/v1"]
        );
    }

    #[rstest]
    fn updates_loose_refs(git_dir: TempDir) {
        let refs = refs(&git_dir);
        refs.update_ref("refs/tags/release/v2", &oid(MAIN_OID)).unwrap();
        refs.update_symref("HEAD", "refs/tags/release/v2").unwrap();

        assert_eq!(
            std::fs::read_to_string(git_dir.path().join("refs/tags/release/v2")).unwrap(),
            format!("{MAIN_OID}\n")
        );
        assert_eq!(refs.ref_resolve("HEAD").unwrap(), oid(MAIN_OID));
    }
}
