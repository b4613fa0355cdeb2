use std::ffi::c_void;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use windows::core::{PCWSTR, PWSTR};
use windows::Win32::Foundation::{LocalFree, ERROR_SUCCESS, HLOCAL};
use windows::Win32::Security::Authorization::{
    ConvertSidToStringSidW, GetNamedSecurityInfoW, SE_FILE_OBJECT,
};
use windows::Win32::Security::{
    AclSizeInformation, GetAce, GetAclInformation, GetSecurityDescriptorControl,
    LookupAccountSidW, ACCESS_ALLOWED_ACE, ACE_HEADER, ACL, ACL_SIZE_INFORMATION,
    CONTAINER_INHERIT_ACE, DACL_SECURITY_INFORMATION, INHERITED_ACE, INHERIT_ONLY_ACE,
    NO_PROPAGATE_INHERIT_ACE, OBJECT_INHERIT_ACE, PSECURITY_DESCRIPTOR, PSID, SE_DACL_PROTECTED,
    SID_NAME_USE,
};
use windows::Win32::System::SystemServices::{ACCESS_ALLOWED_ACE_TYPE, ACCESS_DENIED_ACE_TYPE};

use super::{
    AccessRights, AccessType, AclEntry, AclSnapshot, InheritanceFlags, PropagationFlags,
    EVERYONE_SID,
};
use crate::{AclReader, StorageError};

/// Reads the DACL of a file or directory through `GetNamedSecurityInfoW`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeAclReader;

impl NativeAclReader {
    pub fn new() -> Self {
        Self
    }
}

impl AclReader for NativeAclReader {
    fn read_acl(&self, path: &Path) -> Result<AclSnapshot, StorageError> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();

        let mut dacl: *mut ACL = std::ptr::null_mut();
        let mut descriptor = PSECURITY_DESCRIPTOR::default();

        let status = unsafe {
            GetNamedSecurityInfoW(
                PCWSTR(wide.as_ptr()),
                SE_FILE_OBJECT,
                DACL_SECURITY_INFORMATION,
                None,
                None,
                Some(&mut dacl),
                None,
                &mut descriptor,
            )
        };
        if status != ERROR_SUCCESS {
            let err = std::io::Error::from_raw_os_error(status.0 as i32);
            return Err(StorageError::acl(path, err.to_string()));
        }

        let result = unsafe { convert_descriptor(descriptor, dacl) };

        unsafe {
            let _ = LocalFree(HLOCAL(descriptor.0));
        }

        result.map_err(|reason| StorageError::acl(path, reason))
    }
}

/// The single conversion point from a native security descriptor into an
/// [`AclSnapshot`].
///
/// # Safety
/// `descriptor` and `dacl` must come from a successful `GetNamedSecurityInfoW`
/// call and stay alive for the duration of the call.
unsafe fn convert_descriptor(
    descriptor: PSECURITY_DESCRIPTOR, dacl: *mut ACL,
) -> Result<AclSnapshot, String> {
    let mut control: u16 = 0;
    let mut revision: u32 = 0;
    GetSecurityDescriptorControl(descriptor, &mut control, &mut revision)
        .map_err(|e| e.to_string())?;
    let protected = control & SE_DACL_PROTECTED.0 != 0;

    // A NULL DACL grants everyone full access.
    if dacl.is_null() {
        return Ok(AclSnapshot {
            protected,
            entries: vec![AclEntry {
                principal: "Everyone".to_string(),
                sid: Some(EVERYONE_SID.to_string()),
                access_type: AccessType::Allow,
                rights: AccessRights(AccessRights::FULL_CONTROL),
                is_inherited: false,
                inheritance_flags: InheritanceFlags::default(),
                propagation_flags: PropagationFlags::default(),
            }],
        });
    }

    let mut size_info = ACL_SIZE_INFORMATION::default();
    GetAclInformation(
        dacl,
        &mut size_info as *mut _ as *mut c_void,
        std::mem::size_of::<ACL_SIZE_INFORMATION>() as u32,
        AclSizeInformation,
    )
    .map_err(|e| e.to_string())?;

    let mut entries = Vec::with_capacity(size_info.AceCount as usize);
    for index in 0..size_info.AceCount {
        let mut ace: *mut c_void = std::ptr::null_mut();
        if GetAce(dacl, index, &mut ace).is_err() || ace.is_null() {
            log::warn!("Skipping unreadable ACE #{}", index);
            continue;
        }

        let header = &*(ace as *const ACE_HEADER);
        let access_type = match u32::from(header.AceType) {
            ACCESS_ALLOWED_ACE_TYPE => AccessType::Allow,
            ACCESS_DENIED_ACE_TYPE => AccessType::Deny,
            other => {
                log::debug!("Ignoring ACE #{} of type {}", index, other);
                continue;
            }
        };

        // ACCESS_DENIED_ACE shares the ACCESS_ALLOWED_ACE layout.
        let allowed = &*(ace as *const ACCESS_ALLOWED_ACE);
        let sid = PSID(&allowed.SidStart as *const u32 as *mut c_void);
        let flags = u32::from(header.AceFlags);

        let sid_string = sid_to_string(sid);
        let principal = lookup_account(sid)
            .or_else(|| sid_string.clone())
            .unwrap_or_else(|| "<unknown>".to_string());

        entries.push(AclEntry {
            principal,
            sid: sid_string,
            access_type,
            rights: AccessRights(allowed.Mask),
            is_inherited: flags & INHERITED_ACE.0 != 0,
            inheritance_flags: InheritanceFlags {
                container_inherit: flags & CONTAINER_INHERIT_ACE.0 != 0,
                object_inherit: flags & OBJECT_INHERIT_ACE.0 != 0,
            },
            propagation_flags: PropagationFlags {
                no_propagate_inherit: flags & NO_PROPAGATE_INHERIT_ACE.0 != 0,
                inherit_only: flags & INHERIT_ONLY_ACE.0 != 0,
            },
        });
    }

    Ok(AclSnapshot { protected, entries })
}

unsafe fn sid_to_string(sid: PSID) -> Option<String> {
    let mut raw = PWSTR::null();
    ConvertSidToStringSidW(sid, &mut raw).ok()?;
    let value = raw.to_string().ok();
    let _ = LocalFree(HLOCAL(raw.0 as *mut c_void));
    value
}

/// Resolve a SID to `DOMAIN\name`; `None` for orphaned or unresolvable SIDs.
unsafe fn lookup_account(sid: PSID) -> Option<String> {
    let mut name_len: u32 = 0;
    let mut domain_len: u32 = 0;
    let mut use_kind = SID_NAME_USE::default();

    // First call only sizes the buffers and is expected to fail.
    let _ = LookupAccountSidW(
        PCWSTR::null(),
        sid,
        PWSTR::null(),
        &mut name_len,
        PWSTR::null(),
        &mut domain_len,
        &mut use_kind,
    );
    if name_len == 0 {
        return None;
    }

    let mut name = vec![0u16; name_len as usize];
    let mut domain = vec![0u16; domain_len.max(1) as usize];
    LookupAccountSidW(
        PCWSTR::null(),
        sid,
        PWSTR(name.as_mut_ptr()),
        &mut name_len,
        PWSTR(domain.as_mut_ptr()),
        &mut domain_len,
        &mut use_kind,
    )
    .ok()?;

    let name = String::from_utf16_lossy(&name[..name_len as usize]);
    let domain = String::from_utf16_lossy(&domain[..domain_len as usize]);

    if domain.is_empty() {
        Some(name)
    } else {
        Some(format!("{}\\{}", domain, name))
    }
}
