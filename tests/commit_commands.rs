use crate::common::command::{
    bit_commit, init_repository_dir, repository_dir, run_bit_command, stdout_of,
    with_fixed_author,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const ROOT_TREE: &str = "88484bd9e7919fa9b7dfeb008fb8f6c85743d171";
const ROOT_COMMIT: &str = "e972be13fc5b660dd06f6de2e96b36a6b93bbcd7";

#[rstest]
fn root_commit_matches_git_id(repository_dir: TempDir) {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string()));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    bit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success()
        .stdout(predicate::eq(format!(
            "[(root-commit) {}] Initial commit\n",
            &ROOT_COMMIT[..7]
        )));

    assert_eq!(
        std::fs::read_to_string(repository_dir.path().join(".git/refs/heads/main"))
            .expect("branch was written"),
        format!("{ROOT_COMMIT}\n")
    );
}

#[rstest]
fn cat_file_of_head_prints_commit(init_repository_dir: TempDir) {
    let expected = format!(
        "tree {ROOT_TREE}\n\
         author fake_user <fake_email@email.com> 1672574400 +0000\n\
         committer fake_user <fake_email@email.com> 1672574400 +0000\n\
         \n\
         Initial commit\n"
    );

    run_bit_command(init_repository_dir.path(), &["cat-file", "-p", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::eq(expected));
}

#[rstest]
fn second_commit_links_to_parent(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("4.txt"),
        "four".to_string(),
    ));

    let output = stdout_of(bit_commit(init_repository_dir.path(), "Add 4.txt"));
    assert!(output.starts_with('['));
    assert!(!output.contains("root-commit"));
    assert!(output.ends_with("] Add 4.txt"));

    run_bit_command(init_repository_dir.path(), &["cat-file", "-p", "main"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {ROOT_COMMIT}\n")))
        .stdout(predicate::str::contains("\nAdd 4.txt\n"));
}

#[rstest]
fn commit_tree_prints_commit_id(init_repository_dir: TempDir) {
    let cmd = with_fixed_author(run_bit_command(
        init_repository_dir.path(),
        &["commit-tree", ROOT_TREE, "-m", "Initial commit"],
    ));

    cmd_output_is(cmd, ROOT_COMMIT);
}

#[rstest]
fn commit_tree_with_parent(init_repository_dir: TempDir) {
    let cmd = with_fixed_author(run_bit_command(
        init_repository_dir.path(),
        &["commit-tree", ROOT_TREE, "-p", "HEAD", "-m", "Again"],
    ));
    let oid = stdout_of(cmd);

    run_bit_command(init_repository_dir.path(), &["cat-file", "-p", &oid])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("parent {ROOT_COMMIT}\n")));

    // HEAD is left alone
    run_bit_command(init_repository_dir.path(), &["cat-file", "-p", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("parent").not());
}

#[rstest]
fn commit_tree_of_blob_fails(init_repository_dir: TempDir) {
    with_fixed_author(run_bit_command(
        init_repository_dir.path(),
        &[
            "commit-tree",
            "43dd47ea691c90a5fa7827892c70241913351963",
            "-m",
            "bad",
        ],
    ))
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not a tree"));
}

#[rstest]
fn commit_without_author_fails(repository_dir: TempDir) {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_file(FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string()));

    run_bit_command(repository_dir.path(), &["commit", "-m", "anonymous"])
        .env_remove("GIT_AUTHOR_NAME")
        .env_remove("GIT_AUTHOR_EMAIL")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GIT_AUTHOR_NAME not set"));
}

fn cmd_output_is(cmd: assert_cmd::Command, expected: &str) {
    assert_eq!(stdout_of(cmd), expected);
}
