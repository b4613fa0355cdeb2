use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to list {}: {source}", path.display())]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read ACL of {}: {reason}", path.display())]
    Acl { path: PathBuf, reason: String },

    #[error("ACL reads are not supported on this platform")]
    Unsupported,
}

impl StorageError {
    pub fn list(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::List {
            path: path.into(),
            source,
        }
    }

    pub fn acl(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        StorageError::Acl {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short human readable cause, without the path prefix.
    pub fn reason(&self) -> String {
        match self {
            StorageError::List { source, .. } => source.to_string(),
            StorageError::Acl { reason, .. } => reason.clone(),
            StorageError::Unsupported => self.to_string(),
        }
    }
}
