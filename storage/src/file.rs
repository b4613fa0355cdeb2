use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::{DirectoryLister, StorageError};

/// Local filesystem lister backed by walkdir, one level at a time.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    /// Read the immediate children of `dir`, sorted by file name.
    ///
    /// Links are never followed, so junctions and symlinked directories show
    /// up as non-directory entries and cannot create cycles.
    fn read_children(dir: &Path) -> Result<Vec<DirEntry>, StorageError> {
        let metadata = std::fs::metadata(dir).map_err(|e| StorageError::list(dir, e))?;
        if !metadata.is_dir() {
            return Err(StorageError::list(
                dir,
                io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| entry.map_err(|e| StorageError::list(dir, walkdir_to_io(e))))
            .collect()
    }
}

impl DirectoryLister for LocalStorage {
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        let files = Self::read_children(dir)?
            .into_iter()
            .filter(|entry| !entry.file_type().is_dir())
            .map(DirEntry::into_path)
            .collect::<Vec<_>>();

        log::trace!("{} files under {}", files.len(), dir.display());
        Ok(files)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        let dirs = Self::read_children(dir)?
            .into_iter()
            .filter(|entry| entry.file_type().is_dir())
            .map(DirEntry::into_path)
            .collect::<Vec<_>>();

        log::trace!("{} subdirectories under {}", dirs.len(), dir.display());
        Ok(dirs)
    }
}

fn walkdir_to_io(err: walkdir::Error) -> io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_files_and_dirs_separately() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("b_dir")).unwrap();
        fs::create_dir(temp.path().join("a_dir")).unwrap();
        fs::write(temp.path().join("z.txt"), b"z").unwrap();
        fs::write(temp.path().join("y.txt"), b"y").unwrap();

        let storage = LocalStorage::new();
        let files = storage.list_files(temp.path()).unwrap();
        let dirs = storage.list_dirs(temp.path()).unwrap();

        assert_eq!(
            files,
            vec![temp.path().join("y.txt"), temp.path().join("z.txt")]
        );
        assert_eq!(
            dirs,
            vec![temp.path().join("a_dir"), temp.path().join("b_dir")]
        );
    }

    #[test]
    fn missing_directory_is_a_list_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let err = LocalStorage::new().list_files(&missing).unwrap_err();
        match err {
            StorageError::List { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn file_is_not_listable() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();

        assert!(LocalStorage::new().list_dirs(&file).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_listed_as_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("link")).unwrap();

        let storage = LocalStorage::new();
        assert_eq!(
            storage.list_dirs(temp.path()).unwrap(),
            vec![temp.path().join("real")]
        );
        assert_eq!(
            storage.list_files(temp.path()).unwrap(),
            vec![temp.path().join("link")]
        );
    }
}
