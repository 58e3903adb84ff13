use crate::common::hex_to_raw;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_LINE: &str = "A U Thor <author@example.com> 1672574400 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_tinygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

pub fn run_tinygit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("tinygit").expect("Failed to find tinygit binary");
    cmd.env_remove("RUST_LOG");
    cmd.current_dir(dir);
    cmd.args(args);
    cmd
}

/// Run a command that must succeed and return its stdout
pub fn tinygit_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_tinygit_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stdout.clone()).expect("stdout is not UTF-8")
}

/// Store `content` as an object of `object_type` through `hash-object -w`
pub fn store_object(dir: &Path, object_type: &str, content: &[u8]) -> String {
    let input = dir.join(".object-input");
    std::fs::write(&input, content).expect("Failed to write object input");

    let oid = tinygit_stdout(
        dir,
        &["hash-object", "-w", "-t", object_type, ".object-input"],
    );
    std::fs::remove_file(&input).expect("Failed to remove object input");

    oid.trim_end().to_string()
}

/// Store a tree from `(mode, name, oid)` entries, in the given order
pub fn store_tree(dir: &Path, entries: &[(&str, &str, &str)]) -> String {
    let mut content = Vec::new();
    for (mode, name, oid) in entries {
        content.extend_from_slice(format!("{mode} {name}\0").as_bytes());
        content.extend_from_slice(&hex_to_raw(oid));
    }

    store_object(dir, "tree", &content)
}

pub fn store_commit(dir: &Path, tree: &str, parents: &[&str], message: &str) -> String {
    let mut content = format!("tree {tree}\n");
    for parent in parents {
        content.push_str(&format!("parent {parent}\n"));
    }
    content.push_str(&format!("author {AUTHOR_LINE}\ncommitter {AUTHOR_LINE}\n\n{message}\n"));

    store_object(dir, "commit", content.as_bytes())
}

pub fn set_ref(dir: &Path, name: &str, content: &str) {
    let path = dir.join(".git").join(name);
    std::fs::create_dir_all(path.parent().expect("Ref path has no parent"))
        .expect("Failed to create ref directory");
    std::fs::write(path, content).expect("Failed to write ref");
}

/// Objects of a small history:
///
/// ```text
/// root ── left ──┐
///   └─── right ──┴── merge (HEAD, master)
/// ```
///
/// Every commit points at the same tree: `1.txt` and `a/2.txt`.
pub struct History {
    pub dir: TempDir,
    pub blob_one: String,
    pub blob_two: String,
    pub subtree: String,
    pub tree: String,
    pub root: String,
    pub left: String,
    pub right: String,
    pub merge: String,
}

#[fixture]
pub fn history(init_repository_dir: TempDir) -> History {
    let dir = init_repository_dir;
    let path = dir.path();

    let blob_one = store_object(path, "blob", b"one\n");
    let blob_two = store_object(path, "blob", b"two\n");
    let subtree = store_tree(path, &[("100644", "2.txt", &blob_two)]);
    let tree = store_tree(
        path,
        &[("100644", "1.txt", &blob_one), ("40000", "a", &subtree)],
    );

    let root = store_commit(path, &tree, &[], "root");
    let left = store_commit(path, &tree, &[&root], "left");
    let right = store_commit(path, &tree, &[&root], "right");
    let merge = store_commit(path, &tree, &[&left, &right], "merge");

    set_ref(path, "refs/heads/master", &format!("{merge}\n"));

    History {
        dir,
        blob_one,
        blob_two,
        subtree,
        tree,
        root,
        left,
        right,
        merge,
    }
}
