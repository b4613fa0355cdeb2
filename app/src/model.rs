use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

pub use storage::{AccessRights, AccessType, InheritanceFlags, ObjectKind, PropagationFlags};

/// One scanned filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilesystemObject {
    pub path: PathBuf,
    pub kind: ObjectKind,
}

impl FilesystemObject {
    pub fn new(path: impl Into<PathBuf>, kind: ObjectKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ObjectKind::File)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ObjectKind::Directory)
    }

    pub fn path_string(&self) -> String {
        storage::path_to_string(&self.path)
    }
}

/// One (object, principal) access grant or denial that passed the filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRecord {
    /// Sanitized path, safe for delimited text.
    pub path: String,
    pub object_kind: ObjectKind,
    pub principal: String,
    pub access_type: AccessType,
    pub rights: AccessRights,
    pub is_inherited: bool,
    pub inheritance_flags: InheritanceFlags,
    pub propagation_flags: PropagationFlags,
}

/// A location that could not be enumerated or whose ACL could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipRecord {
    pub path: String,
    pub reason: String,
    pub timestamp: DateTime<Local>,
    pub elapsed_seconds: f64,
}

/// Start of a scan, shared by both phases so skip records carry a common
/// elapsed-time origin.
#[derive(Debug, Clone, Copy)]
pub struct ScanClock {
    started: Instant,
    started_at: DateTime<Local>,
}

impl Default for ScanClock {
    fn default() -> Self {
        Self::start()
    }
}

impl ScanClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            started_at: Local::now(),
        }
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn skip(&self, path: impl Into<String>, reason: impl Into<String>) -> SkipRecord {
        SkipRecord {
            path: path.into(),
            reason: reason.into(),
            timestamp: Local::now(),
            elapsed_seconds: self.elapsed_seconds(),
        }
    }
}
