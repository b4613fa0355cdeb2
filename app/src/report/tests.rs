use std::fs;
use std::path::{Path, PathBuf};

use chrono::TimeZone;
use tempfile::TempDir;

use super::*;
use crate::extract::sanitize_path;
use crate::model::{AccessRights, AccessType, InheritanceFlags, ObjectKind, PropagationFlags};

fn record(path: &str, principal: &str, rights: u32) -> PermissionRecord {
    PermissionRecord {
        path: sanitize_path(path),
        object_kind: ObjectKind::Directory,
        principal: principal.to_string(),
        access_type: AccessType::Allow,
        rights: AccessRights(rights),
        is_inherited: false,
        inheritance_flags: InheritanceFlags {
            container_inherit: true,
            object_inherit: true,
        },
        propagation_flags: PropagationFlags::default(),
    }
}

fn fixed_start() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 11, 30, 15, 36, 59).unwrap()
}

fn writer(dir: &Path, root: &str) -> ReportWriter {
    ReportWriter {
        output_dir: dir.to_path_buf(),
        label: report_label(Path::new(root)),
        started_at: fixed_start(),
        timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
    }
}

#[test]
fn labels_from_drive_or_final_component() {
    assert_eq!(report_label(Path::new(r"X:\")), "X-drive");
    assert_eq!(report_label(Path::new(r"d:\Shares\Finance")), "D-drive");
    assert_eq!(report_label(Path::new("/srv/shares/finance")), "finance");
    assert_eq!(report_label(Path::new("/")), "root");
}

#[test]
fn file_names_carry_label_and_scan_start() {
    let temp = TempDir::new().unwrap();
    let writer = writer(temp.path(), r"X:\");

    assert_eq!(
        writer.permissions_path(),
        temp.path().join("X-drive-permissions_20241130_153659.csv")
    );
    assert_eq!(
        writer.skips_path(),
        temp.path().join("X-drive-skipped_20241130_153659.csv")
    );

    let custom = writer.with_timestamp_format("%Y-%m-%d");
    assert_eq!(
        custom.permissions_path(),
        temp.path().join("X-drive-permissions_2024-11-30.csv")
    );
}

#[test]
fn permissions_file_has_expected_header_and_values() {
    let temp = TempDir::new().unwrap();
    let writer = writer(temp.path(), "/srv/finance");

    let written = writer
        .write_permissions(&[record(
            r"X:\Finance",
            r"CORP\Finance",
            AccessRights::FULL_CONTROL,
        )])
        .unwrap()
        .unwrap();

    let content = fs::read_to_string(&written).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Path,Type,Group/User,Permissions,Inherited,InheritanceFlags,PropagationFlags,AccessControlType"
    );
    assert_eq!(
        lines.next().unwrap(),
        r#"X:\Finance,Directory,CORP\Finance,FullControl,False,"ContainerInherit, ObjectInherit",None,Allow"#
    );
    assert!(lines.next().is_none());
}

#[test]
fn nothing_to_export_writes_no_files() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("reports");
    let writer = writer(&out, r"X:\");

    assert_eq!(writer.write_permissions(&[]).unwrap(), None);
    assert_eq!(writer.write_skips(&[]).unwrap(), None);
    assert!(!out.exists());
}

#[test]
fn skip_file_formats_timestamp_and_elapsed_time() {
    let temp = TempDir::new().unwrap();
    let writer = writer(temp.path(), r"X:\");
    let skip = SkipRecord {
        path: r"X:\Locked".to_string(),
        reason: "Access is denied.".to_string(),
        timestamp: fixed_start(),
        elapsed_seconds: 1.23456,
    };

    let written = writer.write_skips(&[skip]).unwrap().unwrap();
    let content = fs::read_to_string(written).unwrap();

    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Path,Reason,TimeStamp,ElapsedTime",
            r"X:\Locked,Access is denied.,2024-11-30 15:36:59,1.23",
        ]
    );
}

#[test]
fn sanitized_paths_survive_a_round_trip() {
    let temp = TempDir::new().unwrap();
    let writer = writer(temp.path(), r"X:\");
    let records = vec![
        record("X:\\Shares\\quote\"d\r\nname", r"CORP\Alice", AccessRights::READ),
        record(r"X:\Shares\a, b", r"CORP\Bob", AccessRights::MODIFY),
        record(r"X:\Shares\a, b", r"CORP\Carol", AccessRights::READ),
    ];

    let written = writer.write_permissions(&records).unwrap().unwrap();
    let report = PermissionReport::from_path(&written).unwrap();

    assert_eq!(report.len(), 3);
    let paths: Vec<&str> = report.paths().collect();
    assert_eq!(paths, vec![r"X:\Shares\a, b", "X:\\Shares\\quote d  name"]);

    let rows = report.rows_for(r"X:\Shares\a, b");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].principal, r"CORP\Bob");
    assert_eq!(rows[0].permissions, "Modify");
    assert_eq!(rows[1].principal, r"CORP\Carol");
}

#[test]
fn reader_accepts_reports_without_access_type_and_strips_quotes() {
    let input = "Path,Type,Group/User,Permissions,Inherited,InheritanceFlags,PropagationFlags\n\
                 \"\"\"X:\\Data\"\"\",Directory,CORP\\Ops,ReadAndExecute,True,None,None\n";

    let report = PermissionReport::from_reader(input.as_bytes()).unwrap();

    let rows = report.rows_for(r"X:\Data");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].path, r"X:\Data");
    assert_eq!(rows[0].inherited, "True");
    assert_eq!(rows[0].access_control_type, "");
    assert!(report.rows_for(r"X:\Other").is_empty());
}

#[test]
fn samba_paths_drop_the_drive() {
    let base = Path::new("/srv/vg0/share/current");

    assert_eq!(
        to_samba_path(r"X:\Finance\2024", base),
        PathBuf::from("/srv/vg0/share/current/Finance/2024")
    );
    assert_eq!(to_samba_path(r"X:\", base), base.to_path_buf());
    assert_eq!(
        to_samba_path(r"Public\docs", base),
        PathBuf::from("/srv/vg0/share/current/Public/docs")
    );
}
