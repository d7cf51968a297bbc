mod common;

use assert_fs::prelude::*;
use common::{FaultyFs, names_in, snapshot};
use safe_tree::{ErrorKind, FileTree, SequentialNames};

fn layout() -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().unwrap();
    dir.child("src/proj/a.txt").write_str("alpha").unwrap();
    dir.child("src/proj/b.txt").write_str("beta").unwrap();
    dir.child("src/proj/lib/c.txt").write_str("gamma").unwrap();
    dir.child("dest").create_dir_all().unwrap();
    dir
}

#[test]
fn safe_move_failure_restores_source_and_discards_copy() {
    let dir = layout();
    let src = dir.path().join("src/proj");
    let before = snapshot(&src);

    let tree = FileTree::with_parts(
        FaultyFs::new().fail_remove(src.join("lib/c.txt")),
        SequentialNames::default(),
    );
    assert!(tree.move_subtree(&src, dir.path().join("dest"), true).is_err());

    assert_eq!(snapshot(&src), before);
    assert_eq!(names_in(&dir.path().join("src")), vec!["proj"]);
    assert!(names_in(&dir.path().join("dest")).is_empty());
}

#[test]
fn plain_move_of_single_file_is_undone_when_source_sticks() {
    let dir = layout();
    let file = dir.path().join("src/proj/a.txt");

    let tree = FileTree::with_parts(FaultyFs::new().fail_remove(&file), SequentialNames::default());
    assert!(tree.move_subtree(&file, dir.path().join("dest"), false).is_err());

    dir.child("src/proj/a.txt").assert("alpha");
    assert!(names_in(&dir.path().join("dest")).is_empty());
}

#[test]
fn plain_move_failure_after_partial_removal_restores_source() {
    let dir = layout();
    let src = dir.path().join("src/proj");
    let before = snapshot(&src);

    // `a.txt` is removed before the fault on `b.txt` stops the walk.
    let tree = FileTree::with_parts(FaultyFs::new().fail_remove(src.join("b.txt")), SequentialNames::default());
    assert!(tree.move_subtree(&src, dir.path().join("dest"), false).is_err());

    assert_eq!(snapshot(&src), before);
    assert!(names_in(&dir.path().join("dest")).is_empty());
}

#[test]
fn failed_move_into_missing_directory_leaves_no_directories() {
    let dir = layout();
    let src = dir.path().join("src/proj");

    let tree = FileTree::with_parts(FaultyFs::new().fail_remove(src.join("b.txt")), SequentialNames::default());
    assert!(tree.move_subtree(&src, dir.path().join("fresh/inner"), false).is_err());

    assert!(!dir.path().join("fresh").exists());
    dir.child("src/proj/a.txt").assert("alpha");
}

#[test]
fn move_relocates_whole_tree() {
    let dir = layout();
    let before = snapshot(&dir.path().join("src/proj"));

    let target = FileTree::new()
        .move_subtree(dir.path().join("src/proj"), dir.path().join("dest"), true)
        .unwrap();

    assert_eq!(target, dir.path().join("dest/proj"));
    assert_eq!(snapshot(&target), before);
    assert!(names_in(&dir.path().join("src")).is_empty());
}

#[test]
fn move_onto_existing_target_is_refused() {
    let dir = layout();
    dir.child("dest/proj").create_dir_all().unwrap();
    let err = FileTree::new()
        .move_subtree(dir.path().join("src/proj"), dir.path().join("dest"), false)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    assert!(dir.path().join("src/proj/a.txt").exists());
}

#[test]
fn rename_in_place() {
    let dir = layout();
    let tree = FileTree::new();

    let renamed = tree.rename(dir.path().join("src/proj/a.txt"), "first.txt").unwrap();
    assert_eq!(renamed, dir.path().join("src/proj/first.txt"));
    dir.child("src/proj/first.txt").assert("alpha");

    let clash = tree.rename(dir.path().join("src/proj/b.txt"), "first.txt").unwrap_err();
    assert_eq!(clash.kind(), ErrorKind::AlreadyExists);

    for bad in ["", "..", "x/y"] {
        let err = tree.rename(dir.path().join("src/proj/b.txt"), bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "name {bad:?}");
    }
    dir.child("src/proj/b.txt").assert("beta");
}
