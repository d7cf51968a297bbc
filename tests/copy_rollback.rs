mod common;

use assert_fs::prelude::*;
use common::{FaultyFs, names_in, snapshot};
use safe_tree::{ConflictPolicy, CopyOptions, ErrorKind, FileTree, SequentialNames};

fn source_tree() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("src/proj/a.txt").write_str("alpha").unwrap();
    dir.child("src/proj/b.txt").write_str("beta").unwrap();
    dir.child("src/proj/nested/c.txt").write_str("gamma").unwrap();
    dir.child("src/proj/nested/d.txt").write_str("delta").unwrap();
    dir.child("dest").create_dir_all().unwrap();
    dir
}

#[test]
fn failure_on_nth_child_leaves_nothing_behind() {
    let dir = source_tree();
    for n in 1..=4 {
        let tree = FileTree::with_parts(FaultyFs::new().fail_nth_copy(n), SequentialNames::default());
        let err = tree
            .copy_subtree(dir.path().join("src/proj"), dir.path().join("dest"), CopyOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure, "copy #{n}");
        assert!(names_in(&dir.path().join("dest")).is_empty(), "leftovers after failing copy #{n}");
    }
}

#[test]
fn rollback_keeps_preexisting_destination_content() {
    let dir = source_tree();
    dir.child("dest/proj/mine.txt").write_str("keep me").unwrap();
    let dest_file = dir.path().join("dest/proj/nested/d.txt");

    let tree = FileTree::with_parts(FaultyFs::new().fail_copy_to(&dest_file), SequentialNames::default());
    let opts = CopyOptions::new(true, ConflictPolicy::Skip);
    assert!(tree.copy_subtree(dir.path().join("src/proj"), dir.path().join("dest"), opts).is_err());

    assert_eq!(names_in(&dir.path().join("dest/proj")), vec!["mine.txt"]);
    dir.child("dest/proj/mine.txt").assert("keep me");
}

#[test]
fn skip_policy_copy_is_idempotent() {
    let dir = source_tree();
    let tree = FileTree::new();
    let opts = CopyOptions::new(true, ConflictPolicy::Skip);

    tree.copy_subtree(dir.path().join("src/proj"), dir.path().join("dest"), opts).unwrap();
    let once = snapshot(&dir.path().join("dest"));
    tree.copy_subtree(dir.path().join("src/proj"), dir.path().join("dest"), opts).unwrap();
    assert_eq!(snapshot(&dir.path().join("dest")), once);
    assert_eq!(once, snapshot(&dir.path().join("src")));
}

#[test]
fn replace_policy_overwrites_files() {
    let dir = source_tree();
    dir.child("dest/proj/a.txt").write_str("stale").unwrap();
    FileTree::new()
        .copy_subtree_default(dir.path().join("src/proj"), dir.path().join("dest"))
        .unwrap();
    dir.child("dest/proj/a.txt").assert("alpha");
}

#[test]
fn missing_destination_directory_is_created() {
    let dir = source_tree();
    let log = FileTree::new()
        .copy_subtree_logged(
            dir.path().join("src/proj/a.txt"),
            dir.path().join("new/deeper"),
            CopyOptions::default(),
        )
        .unwrap();
    dir.child("new/deeper/a.txt").assert("alpha");
    assert_eq!(log.len(), 3);
}

#[test]
fn failed_copy_removes_destination_directories_it_created() {
    let dir = source_tree();
    let tree = FileTree::with_parts(FaultyFs::new().fail_nth_copy(2), SequentialNames::default());

    let err = tree
        .copy_subtree(dir.path().join("src/proj"), dir.path().join("new/deeper"), CopyOptions::default())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IoFailure);
    assert!(!dir.path().join("new").exists());
    assert_eq!(names_in(dir.path()), vec!["dest", "src"]);
}

#[test]
fn attributes_are_preserved_when_requested() {
    use filetime::{FileTime, set_file_mtime};
    let dir = source_tree();
    let src = dir.path().join("src/proj/a.txt");
    let old = FileTime::from_unix_time(1_200_000_000, 0);
    set_file_mtime(&src, old).unwrap();

    let tree = FileTree::new();
    tree.copy_subtree(&src, dir.path().join("kept"), CopyOptions::new(true, ConflictPolicy::Fail))
        .unwrap();
    tree.copy_subtree(&src, dir.path().join("fresh"), CopyOptions::new(false, ConflictPolicy::Fail))
        .unwrap();

    let mtime = |p: &str| FileTime::from_last_modification_time(&std::fs::metadata(dir.path().join(p)).unwrap());
    assert_eq!(mtime("kept/a.txt"), old);
    assert_ne!(mtime("fresh/a.txt"), old);
}
