use std::fs;
use tempfile::TempDir;

/// Small share-like tree used by the integration tests.
///
/// root/
///   file1.txt, file2.txt, empty_file.txt, binary.dat
///   dir1/        file3.txt, subdir1/file4.txt
///   dir2/        file5.txt
///   empty_dir/
pub fn create_test_structure() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir_all(root.join("dir1/subdir1")).unwrap();
    fs::create_dir_all(root.join("dir2")).unwrap();
    fs::create_dir_all(root.join("empty_dir")).unwrap();

    fs::write(root.join("file1.txt"), b"content1").unwrap();
    fs::write(root.join("file2.txt"), b"content2").unwrap();
    fs::write(root.join("dir1/file3.txt"), b"content3").unwrap();
    fs::write(root.join("dir1/subdir1/file4.txt"), b"content4").unwrap();
    fs::write(root.join("dir2/file5.txt"), b"content5").unwrap();
    fs::write(root.join("empty_file.txt"), b"").unwrap();
    fs::write(root.join("binary.dat"), vec![0u8; 1024]).unwrap();

    temp_dir
}
