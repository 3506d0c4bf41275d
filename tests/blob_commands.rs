use crate::common::command::{repository_dir, run_bit_command, stdout_of};
use crate::common::file::write_generated_files;
use assert_fs::TempDir;
use assert_fs::fixture::{FileWriteStr, PathChild};
use predicates::prelude::predicate;
use rstest::{fixture, rstest};

mod common;

const HELLO_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

#[fixture]
fn initialized_dir(repository_dir: TempDir) -> TempDir {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

#[rstest]
fn hash_object_prints_id_without_storing(
    initialized_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("hello.txt").write_str("hello\n")?;

    run_bit_command(initialized_dir.path(), &["hash-object", "hello.txt"])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{HELLO_OID}\n")));

    let object_path = initialized_dir
        .path()
        .join(".git/objects")
        .join(&HELLO_OID[..2])
        .join(&HELLO_OID[2..]);
    assert!(!object_path.exists());

    Ok(())
}

#[rstest]
fn hash_object_with_write_stores_loose_object(
    initialized_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    initialized_dir.child("hello.txt").write_str("hello\n")?;

    run_bit_command(initialized_dir.path(), &["hash-object", "-w", "hello.txt"])
        .assert()
        .success()
        .stdout(predicate::eq(format!("{HELLO_OID}\n")));

    let object_path = initialized_dir
        .path()
        .join(".git/objects")
        .join(&HELLO_OID[..2])
        .join(&HELLO_OID[2..]);
    assert!(object_path.is_file());

    Ok(())
}

#[rstest]
fn cat_file_prints_written_blobs(initialized_dir: TempDir) {
    let files = write_generated_files(initialized_dir.path(), 3);

    for file in files {
        let file_name = file
            .path
            .file_name()
            .expect("generated file has a name")
            .to_string_lossy()
            .to_string();
        let oid = stdout_of(run_bit_command(
            initialized_dir.path(),
            &["hash-object", "-w", &file_name],
        ));

        run_bit_command(initialized_dir.path(), &["cat-file", "-p", &oid])
            .assert()
            .success()
            .stdout(predicate::eq(file.content));
    }
}

#[rstest]
fn cat_file_of_unknown_object_fails(initialized_dir: TempDir) {
    run_bit_command(
        initialized_dir.path(),
        &["cat-file", "-p", "0123456789abcdef0123456789abcdef01234567"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("object not found"));
}

#[rstest]
fn hash_object_of_missing_file_fails(initialized_dir: TempDir) {
    run_bit_command(initialized_dir.path(), &["hash-object", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fatal:"));
}
