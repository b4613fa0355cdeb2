use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use utils::error::Result;

use super::{csv_error, PermissionRow};

/// A permissions report loaded back from disk, rows grouped by path.
#[derive(Debug, Default)]
pub struct PermissionReport {
    by_path: BTreeMap<String, Vec<PermissionRow>>,
}

impl PermissionReport {
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
        Self::from_csv(reader).map_err(|e| csv_error(path, e))
    }

    pub fn from_reader<R: io::Read>(input: R) -> std::result::Result<Self, csv::Error> {
        Self::from_csv(csv::Reader::from_reader(input))
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> std::result::Result<Self, csv::Error> {
        let mut report = Self::default();
        for row in reader.deserialize() {
            let mut row: PermissionRow = row?;
            row.path = row.path.trim_matches('"').to_string();
            report.by_path.entry(row.path.clone()).or_default().push(row);
        }
        Ok(report)
    }

    /// Audited paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.by_path.keys().map(String::as_str)
    }

    pub fn rows_for(&self, path: &str) -> &[PermissionRow] {
        self.by_path.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_path.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }
}

/// Where a Windows path lands under a Samba share root: the drive prefix is
/// dropped and backslashes become forward slashes.
pub fn to_samba_path(windows_path: &str, base: &Path) -> PathBuf {
    let without_drive = match windows_path.split_once(':') {
        Some((_, rest)) => rest,
        None => windows_path,
    };
    let relative = without_drive.replace('\\', "/");
    let relative = relative.trim_start_matches('/');

    if relative.is_empty() {
        base.to_path_buf()
    } else {
        base.join(relative)
    }
}
