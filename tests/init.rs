use crate::common::command::{repository_dir, run_tinygit_command, tinygit_stdout};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn new_repository_initiated_with_git_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = repository_dir.path().join("project");
    let git_dir = target.join(".git");

    let stdout = tinygit_stdout(repository_dir.path(), &["init", "project"]);

    assert_eq!(
        stdout,
        format!(
            "Initialized empty Git repository in {}\n",
            target.canonicalize()?.join(".git").display()
        )
    );
    for dir in ["branches", "objects", "refs/heads", "refs/tags"] {
        assert!(git_dir.join(dir).is_dir(), "missing {dir}");
    }
    assert_eq!(
        std::fs::read_to_string(git_dir.join("HEAD"))?,
        "ref: refs/heads/master\n"
    );
    assert_eq!(
        std::fs::read_to_string(git_dir.join("config"))?,
        "[core]\nbare=false\nfilemode=false\nrepositoryformatversion=0\n"
    );
    assert_eq!(
        std::fs::read_to_string(git_dir.join("description"))?,
        "Unnamed repository; edit this file 'description' to name the repository.\n"
    );

    Ok(())
}

#[rstest]
fn init_defaults_to_current_directory(repository_dir: TempDir) {
    run_tinygit_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Initialized empty Git repository in",
        ));

    assert!(repository_dir.path().join(".git").join("objects").is_dir());
}

#[rstest]
fn init_refuses_an_existing_repository(repository_dir: TempDir) {
    run_tinygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_tinygit_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("directory not empty"));
}

#[rstest]
fn freshly_initialized_repository_can_be_used(repository_dir: TempDir) {
    run_tinygit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_tinygit_command(repository_dir.path(), &["show-ref"])
        .assert()
        .success()
        .stdout("");
    run_tinygit_command(repository_dir.path(), &["tag"])
        .assert()
        .success()
        .stdout("");
}
