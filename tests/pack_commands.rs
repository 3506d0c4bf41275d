use crate::common::command::{repository_dir, run_bit_command};
use crate::common::pack::{BLOB, OFS_DELTA, TREE, build_pack, object_header, zlib};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::{fixture, rstest};

mod common;

const HELLO_OID: &str = "ce013625030ba8dba906f756967f9e9ca394464a";
const HELLO_TREE: &str = "aaa96ced2d9a1c8e72c56b253a0e2fe78393feb7";

#[fixture]
fn initialized_dir(repository_dir: TempDir) -> TempDir {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    repository_dir
}

fn hello_tree_payload() -> Vec<u8> {
    let mut payload = b"100644 hello.txt\0".to_vec();
    payload.extend(hex::decode(HELLO_OID).expect("valid hex"));
    payload
}

#[rstest]
fn unpack_objects_from_file(initialized_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let tree = hello_tree_payload();
    let pack = build_pack(&[(BLOB, b"hello\n".as_slice()), (TREE, tree.as_slice())]);
    let pack_path = initialized_dir.path().join("incoming.pack");
    std::fs::write(&pack_path, pack)?;

    run_bit_command(
        initialized_dir.path(),
        &["unpack-objects", &pack_path.display().to_string()],
    )
    .assert()
    .success()
    .stdout(predicate::eq(format!("{HELLO_OID}\n{HELLO_TREE}\n")));

    run_bit_command(initialized_dir.path(), &["ls-tree", HELLO_TREE])
        .assert()
        .success()
        .stdout(predicate::eq(format!("100644 blob {HELLO_OID}\thello.txt\n")));

    Ok(())
}

#[rstest]
fn unpack_objects_from_stdin(initialized_dir: TempDir) {
    let pack = build_pack(&[(BLOB, b"hello\n".as_slice())]);

    run_bit_command(initialized_dir.path(), &["unpack-objects"])
        .write_stdin(pack)
        .assert()
        .success()
        .stdout(predicate::eq(format!("{HELLO_OID}\n")));

    run_bit_command(initialized_dir.path(), &["cat-file", "-p", HELLO_OID])
        .assert()
        .success()
        .stdout(predicate::eq("hello\n"));
}

#[rstest]
fn unpack_objects_of_empty_pack(initialized_dir: TempDir) {
    run_bit_command(initialized_dir.path(), &["unpack-objects"])
        .write_stdin(build_pack(&[]))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[rstest]
#[case::wrong_magic(b"KCAP\0\0\0\x02\0\0\0\0".to_vec())]
#[case::unknown_version(b"PACK\0\0\0\x04\0\0\0\0".to_vec())]
#[case::too_short(b"PAC".to_vec())]
fn unpack_objects_rejects_bad_header(initialized_dir: TempDir, #[case] pack: Vec<u8>) {
    run_bit_command(initialized_dir.path(), &["unpack-objects"])
        .write_stdin(pack)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad pack header"));
}

#[rstest]
fn unpack_objects_stops_at_delta(initialized_dir: TempDir) {
    let mut pack = build_pack(&[(BLOB, b"hello\n".as_slice())]);
    // drop the trailer, append a delta entry and advertise two objects
    pack.truncate(pack.len() - 20);
    pack[11] = 2;
    pack.extend(object_header(OFS_DELTA, 6));
    pack.push(0x01);
    pack.extend(zlib(b"\x06\x06\x90\x06"));
    pack.extend_from_slice(&[0u8; 20]);

    run_bit_command(initialized_dir.path(), &["unpack-objects"])
        .write_stdin(pack)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported delta object (ofs-delta)"));

    // entries before the delta are kept
    run_bit_command(initialized_dir.path(), &["cat-file", "-p", HELLO_OID])
        .assert()
        .success()
        .stdout(predicate::eq("hello\n"));
}

#[rstest]
fn unpack_objects_rejects_truncated_pack(initialized_dir: TempDir) {
    let mut pack = build_pack(&[(BLOB, b"hello\n".as_slice())]);
    pack.truncate(16);

    run_bit_command(initialized_dir.path(), &["unpack-objects"])
        .write_stdin(pack)
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt object"));
}
