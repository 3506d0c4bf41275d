use crate::common::command::{init_repository_dir, run_bit_command, stdout_of};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const ROOT_TREE: &str = "88484bd9e7919fa9b7dfeb008fb8f6c85743d171";
const TREE_A: &str = "202bc192d34beb85d0301ec8c8940cd0252cc48a";
const TREE_B: &str = "d864f7793fd2952c217c27d3780442f8943c8663";
const BLOB_ONE: &str = "43dd47ea691c90a5fa7827892c70241913351963";
const BLOB_TWO: &str = "64c5e5885a4b06010b3a0c20edb7900dd0311025";
const BLOB_THREE: &str = "1d19714ffbc272ba0da6eb419d66123c20527174";

#[rstest]
fn write_tree_matches_git_ids(init_repository_dir: TempDir) {
    run_bit_command(init_repository_dir.path(), &["write-tree"])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{ROOT_TREE}\n")));
}

#[rstest]
fn write_tree_ignores_metadata_directory(init_repository_dir: TempDir) {
    // .git already holds objects and refs from the initial commit
    let first = stdout_of(run_bit_command(init_repository_dir.path(), &["write-tree"]));
    let second = stdout_of(run_bit_command(init_repository_dir.path(), &["write-tree"]));

    assert_eq!(first, ROOT_TREE);
    assert_eq!(second, ROOT_TREE);
}

#[rstest]
fn ls_tree_of_head_lists_root_entries(init_repository_dir: TempDir) {
    let expected = format!("100644 blob {BLOB_ONE}\t1.txt\n040000 tree {TREE_A}\ta\n");

    run_bit_command(init_repository_dir.path(), &["ls-tree", "HEAD"])
        .assert()
        .success()
        .stdout(predicate::eq(expected));
}

#[rstest]
fn ls_tree_of_subtree(init_repository_dir: TempDir) {
    let expected = format!("100644 blob {BLOB_TWO}\t2.txt\n040000 tree {TREE_B}\tb\n");

    run_bit_command(init_repository_dir.path(), &["ls-tree", TREE_A])
        .assert()
        .success()
        .stdout(predicate::eq(expected));
}

#[rstest]
fn ls_tree_name_only(init_repository_dir: TempDir) {
    run_bit_command(init_repository_dir.path(), &["ls-tree", "--name-only", TREE_B])
        .assert()
        .success()
        .stdout(predicate::eq("3.txt\n"));
}

#[rstest]
fn cat_file_of_blob_from_tree(init_repository_dir: TempDir) {
    run_bit_command(init_repository_dir.path(), &["cat-file", "-p", BLOB_THREE])
        .assert()
        .success()
        .stdout(predicate::eq("three"));
}

#[rstest]
fn ls_tree_of_blob_fails(init_repository_dir: TempDir) {
    run_bit_command(init_repository_dir.path(), &["ls-tree", BLOB_ONE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a tree"));
}
