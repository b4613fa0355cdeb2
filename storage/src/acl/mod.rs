//! Host ACL model and the native reader.
//!
//! Every platform specific representation is converted into an
//! [`AclSnapshot`] in exactly one place: `windows.rs` for NTFS security
//! descriptors, `posix.rs` for mode bits.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use posix::NativeAclReader;
#[cfg(windows)]
pub use windows::NativeAclReader;

#[cfg(not(any(unix, windows)))]
mod unsupported {
    use std::path::Path;

    use crate::{AclReader, AclSnapshot, StorageError};

    #[derive(Debug, Default, Clone, Copy)]
    pub struct NativeAclReader;

    impl NativeAclReader {
        pub fn new() -> Self {
            Self
        }
    }

    impl AclReader for NativeAclReader {
        fn read_acl(&self, _path: &Path) -> Result<AclSnapshot, StorageError> {
            Err(StorageError::Unsupported)
        }
    }
}
#[cfg(not(any(unix, windows)))]
pub use unsupported::NativeAclReader;

/// Well-known SID of the local SYSTEM account.
pub const SYSTEM_SID: &str = "S-1-5-18";
/// Well-known SID of the Everyone group.
pub const EVERYONE_SID: &str = "S-1-1-0";

/// The discretionary ACL of one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclSnapshot {
    /// The ACL does not inherit entries from its parent container.
    pub protected: bool,
    pub entries: Vec<AclEntry>,
}

/// One access-control entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    /// Account name, `DOMAIN\name` form when it resolves, otherwise the SID string.
    pub principal: String,
    pub sid: Option<String>,
    pub access_type: AccessType,
    pub rights: AccessRights,
    pub is_inherited: bool,
    pub inheritance_flags: InheritanceFlags,
    pub propagation_flags: PropagationFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessType {
    Allow,
    Deny,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Allow => write!(f, "Allow"),
            AccessType::Deny => write!(f, "Deny"),
        }
    }
}

/// Access mask in the native NTFS rights vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRights(pub u32);

impl AccessRights {
    pub const READ_DATA: u32 = 0x0000_0001;
    pub const WRITE_DATA: u32 = 0x0000_0002;
    pub const APPEND_DATA: u32 = 0x0000_0004;
    pub const READ_EXTENDED_ATTRIBUTES: u32 = 0x0000_0008;
    pub const WRITE_EXTENDED_ATTRIBUTES: u32 = 0x0000_0010;
    pub const EXECUTE_FILE: u32 = 0x0000_0020;
    pub const DELETE_SUBDIRECTORIES_AND_FILES: u32 = 0x0000_0040;
    pub const READ_ATTRIBUTES: u32 = 0x0000_0080;
    pub const WRITE_ATTRIBUTES: u32 = 0x0000_0100;
    pub const DELETE: u32 = 0x0001_0000;
    pub const READ_PERMISSIONS: u32 = 0x0002_0000;
    pub const CHANGE_PERMISSIONS: u32 = 0x0004_0000;
    pub const TAKE_OWNERSHIP: u32 = 0x0008_0000;
    pub const SYNCHRONIZE: u32 = 0x0010_0000;

    pub const READ: u32 = 0x0002_0089;
    pub const WRITE: u32 = 0x0000_0116;
    pub const READ_AND_EXECUTE: u32 = 0x0002_00A9;
    pub const MODIFY: u32 = 0x0003_01BF;
    pub const FULL_CONTROL: u32 = 0x001F_01FF;

    pub const GENERIC_ALL: u32 = 0x1000_0000;
    pub const GENERIC_EXECUTE: u32 = 0x2000_0000;
    pub const GENERIC_WRITE: u32 = 0x4000_0000;
    pub const GENERIC_READ: u32 = 0x8000_0000;

    /// Names by descending value. Composites come before the single bits they
    /// contain so that e.g. `0x1301BF` renders as `Modify, Synchronize`.
    const NAMES: &'static [(u32, &'static str)] = &[
        (Self::GENERIC_READ, "GenericRead"),
        (Self::GENERIC_WRITE, "GenericWrite"),
        (Self::GENERIC_EXECUTE, "GenericExecute"),
        (Self::GENERIC_ALL, "GenericAll"),
        (Self::FULL_CONTROL, "FullControl"),
        (Self::SYNCHRONIZE, "Synchronize"),
        (Self::TAKE_OWNERSHIP, "TakeOwnership"),
        (Self::CHANGE_PERMISSIONS, "ChangePermissions"),
        (Self::MODIFY, "Modify"),
        (Self::READ_AND_EXECUTE, "ReadAndExecute"),
        (Self::READ, "Read"),
        (Self::READ_PERMISSIONS, "ReadPermissions"),
        (Self::DELETE, "Delete"),
        (Self::WRITE, "Write"),
        (Self::WRITE_ATTRIBUTES, "WriteAttributes"),
        (Self::READ_ATTRIBUTES, "ReadAttributes"),
        (Self::DELETE_SUBDIRECTORIES_AND_FILES, "DeleteSubdirectoriesAndFiles"),
        (Self::EXECUTE_FILE, "ExecuteFile"),
        (Self::WRITE_EXTENDED_ATTRIBUTES, "WriteExtendedAttributes"),
        (Self::READ_EXTENDED_ATTRIBUTES, "ReadExtendedAttributes"),
        (Self::APPEND_DATA, "AppendData"),
        (Self::WRITE_DATA, "WriteData"),
        (Self::READ_DATA, "ReadData"),
    ];

    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Greedy match against `NAMES` from the largest mask down, so composite
    /// names absorb their parts, then reversed. Unnamed leftover bits are
    /// appended as a hex literal.
    pub fn names(self) -> Vec<String> {
        let mut remaining = self.0;
        let mut names = Vec::new();

        for &(mask, name) in Self::NAMES {
            if remaining & mask == mask {
                names.push(name.to_string());
                remaining &= !mask;
            }
        }
        names.reverse();

        if remaining != 0 {
            names.push(format!("0x{:08X}", remaining));
        }
        names
    }
}

impl From<u32> for AccessRights {
    fn from(mask: u32) -> Self {
        AccessRights(mask)
    }
}

impl fmt::Display for AccessRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        write!(f, "{}", self.names().join(", "))
    }
}

/// Which kinds of children inherit an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceFlags {
    pub container_inherit: bool,
    pub object_inherit: bool,
}

impl fmt::Display for InheritanceFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.container_inherit, self.object_inherit) {
            (false, false) => write!(f, "None"),
            (true, false) => write!(f, "ContainerInherit"),
            (false, true) => write!(f, "ObjectInherit"),
            (true, true) => write!(f, "ContainerInherit, ObjectInherit"),
        }
    }
}

/// How an inheritable entry propagates below the immediate children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationFlags {
    pub no_propagate_inherit: bool,
    pub inherit_only: bool,
}

impl fmt::Display for PropagationFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.no_propagate_inherit, self.inherit_only) {
            (false, false) => write!(f, "None"),
            (true, false) => write!(f, "NoPropagateInherit"),
            (false, true) => write!(f, "InheritOnly"),
            (true, true) => write!(f, "NoPropagateInherit, InheritOnly"),
        }
    }
}
