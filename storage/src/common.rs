use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Kind of a scanned filesystem object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    File,
    Directory,
}

impl ObjectKind {
    pub fn is_dir(self) -> bool {
        matches!(self, ObjectKind::Directory)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::File => write!(f, "File"),
            ObjectKind::Directory => write!(f, "Directory"),
        }
    }
}

/// Lossy string form of a path, as used in reports and classification.
pub fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
