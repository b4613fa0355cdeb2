mod common;

use std::path::PathBuf;

use common::create_test_structure;
use storage::{AclReader, DirectoryLister, LocalStorage, NativeAclReader};

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_local_listing_separates_files_and_dirs() {
    let temp_dir = create_test_structure();
    let storage = LocalStorage::new();

    let files = storage.list_files(temp_dir.path()).unwrap();
    let dirs = storage.list_dirs(temp_dir.path()).unwrap();

    assert_eq!(
        names(&files),
        vec!["binary.dat", "empty_file.txt", "file1.txt", "file2.txt"]
    );
    assert_eq!(names(&dirs), vec!["dir1", "dir2", "empty_dir"]);
    assert!(files.iter().all(|p| p.starts_with(temp_dir.path())));
}

#[test]
fn test_local_listing_is_not_recursive() {
    let temp_dir = create_test_structure();
    let storage = LocalStorage::new();
    let dir1 = temp_dir.path().join("dir1");

    assert_eq!(names(&storage.list_files(&dir1).unwrap()), vec!["file3.txt"]);
    assert_eq!(names(&storage.list_dirs(&dir1).unwrap()), vec!["subdir1"]);

    let empty = temp_dir.path().join("empty_dir");
    assert!(storage.list_files(&empty).unwrap().is_empty());
    assert!(storage.list_dirs(&empty).unwrap().is_empty());
}

#[test]
fn test_listing_missing_directory_reports_path() {
    let temp_dir = create_test_structure();
    let missing = temp_dir.path().join("gone");

    let err = LocalStorage::new().list_files(&missing).unwrap_err();
    assert!(err.to_string().contains("gone"));
    assert!(!err.reason().is_empty());
}

#[test]
fn test_native_reader_reads_every_listed_object() {
    let temp_dir = create_test_structure();
    let storage = LocalStorage::new();
    let reader = NativeAclReader::new();

    let mut objects = storage.list_files(temp_dir.path()).unwrap();
    objects.extend(storage.list_dirs(temp_dir.path()).unwrap());

    for object in objects {
        let snapshot = reader.read_acl(&object).unwrap();
        assert!(
            !snapshot.entries.is_empty(),
            "{} should carry at least one entry",
            object.display()
        );
    }
}

#[test]
fn test_native_reader_fails_on_missing_object() {
    let temp_dir = create_test_structure();
    let missing = temp_dir.path().join("gone.txt");

    let err = NativeAclReader::new().read_acl(&missing).unwrap_err();
    assert!(err.to_string().contains("gone.txt"));
}
