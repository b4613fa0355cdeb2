use std::os::unix::fs::MetadataExt;
use std::path::Path;

use super::{
    AccessRights, AccessType, AclEntry, AclSnapshot, InheritanceFlags, PropagationFlags,
    EVERYONE_SID,
};
use crate::{AclReader, StorageError};

/// Presents POSIX mode bits as three explicit entries, named the way Samba
/// maps unmapped Unix identities (`Unix User\<uid>`, `Unix Group\<gid>`).
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAclReader;

impl NativeAclReader {
    pub fn new() -> Self {
        Self
    }
}

impl AclReader for NativeAclReader {
    fn read_acl(&self, path: &Path) -> Result<AclSnapshot, StorageError> {
        let metadata =
            std::fs::symlink_metadata(path).map_err(|e| StorageError::acl(path, e.to_string()))?;

        Ok(snapshot_from_mode(
            metadata.mode(),
            metadata.uid(),
            metadata.gid(),
        ))
    }
}

/// Mode bits never inherit, so the snapshot is always protected.
pub(crate) fn snapshot_from_mode(mode: u32, uid: u32, gid: u32) -> AclSnapshot {
    let triads = [
        (
            (mode >> 6) & 0o7,
            format!("Unix User\\{}", uid),
            format!("S-1-22-1-{}", uid),
        ),
        (
            (mode >> 3) & 0o7,
            format!("Unix Group\\{}", gid),
            format!("S-1-22-2-{}", gid),
        ),
        (mode & 0o7, "Everyone".to_string(), EVERYONE_SID.to_string()),
    ];

    let entries = triads
        .into_iter()
        .filter(|(bits, _, _)| *bits != 0)
        .map(|(bits, principal, sid)| AclEntry {
            principal,
            sid: Some(sid),
            access_type: AccessType::Allow,
            rights: rights_from_triad(bits),
            is_inherited: false,
            inheritance_flags: InheritanceFlags::default(),
            propagation_flags: PropagationFlags::default(),
        })
        .collect();

    AclSnapshot {
        protected: true,
        entries,
    }
}

fn rights_from_triad(bits: u32) -> AccessRights {
    let mut mask = 0;
    if bits & 0o4 != 0 {
        mask |= AccessRights::READ;
    }
    if bits & 0o2 != 0 {
        mask |= AccessRights::WRITE;
    }
    if bits & 0o1 != 0 {
        mask |= AccessRights::EXECUTE_FILE;
    }
    AccessRights(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_triads_become_entries() {
        let snapshot = snapshot_from_mode(0o100754, 1000, 100);

        assert!(snapshot.protected);
        assert_eq!(snapshot.entries.len(), 3);

        let owner = &snapshot.entries[0];
        assert_eq!(owner.principal, "Unix User\\1000");
        assert_eq!(owner.sid.as_deref(), Some("S-1-22-1-1000"));
        assert_eq!(owner.rights.to_string(), "Write, ReadAndExecute");

        let group = &snapshot.entries[1];
        assert_eq!(group.principal, "Unix Group\\100");
        assert_eq!(group.rights.to_string(), "ReadAndExecute");

        let other = &snapshot.entries[2];
        assert_eq!(other.principal, "Everyone");
        assert_eq!(other.rights.to_string(), "Read");
    }

    #[test]
    fn empty_triads_are_dropped() {
        let snapshot = snapshot_from_mode(0o600, 0, 0);
        assert_eq!(snapshot.entries.len(), 1);
        assert!(snapshot.entries.iter().all(|e| !e.is_inherited));
    }
}
