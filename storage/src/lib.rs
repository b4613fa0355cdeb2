pub mod acl;
pub mod common;
pub mod error;
pub mod file;

pub use acl::*;
pub use common::*;
pub use error::StorageError;
pub use file::*;

use std::path::{Path, PathBuf};

/// Lists the immediate children of a directory, files and subdirectories
/// separately. Implementations never recurse.
pub trait DirectoryLister {
    /// Non-directory children (regular files, symlinks, junctions).
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError>;

    /// Directory children. Links to directories are not included.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError>;
}

/// Reads the access-control list attached to a filesystem object.
pub trait AclReader {
    fn read_acl(&self, path: &Path) -> Result<AclSnapshot, StorageError>;
}

impl<T: DirectoryLister + ?Sized> DirectoryLister for &T {
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        (**self).list_files(dir)
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
        (**self).list_dirs(dir)
    }
}

impl<T: AclReader + ?Sized> AclReader for &T {
    fn read_acl(&self, path: &Path) -> Result<AclSnapshot, StorageError> {
        (**self).read_acl(path)
    }
}
