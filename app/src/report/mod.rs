//! Delimited-text export of an audit run.
//!
//! Two files per run, both stamped with the scan start time: the permission
//! grants and the locations that could not be audited. A file is only
//! created when it would contain at least one row.

use std::fs;
use std::path::{Component, Path, PathBuf, Prefix};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use utils::error::{Error, Result};

use crate::model::{PermissionRecord, ScanClock, SkipRecord};

mod reader;

pub use self::reader::{to_samba_path, PermissionReport};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One line of the permissions file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRow {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Type")]
    pub object_type: String,
    #[serde(rename = "Group/User")]
    pub principal: String,
    #[serde(rename = "Permissions")]
    pub permissions: String,
    #[serde(rename = "Inherited")]
    pub inherited: String,
    #[serde(rename = "InheritanceFlags")]
    pub inheritance_flags: String,
    #[serde(rename = "PropagationFlags")]
    pub propagation_flags: String,
    /// Absent in reports produced by older tooling.
    #[serde(rename = "AccessControlType", default)]
    pub access_control_type: String,
}

impl From<&PermissionRecord> for PermissionRow {
    fn from(record: &PermissionRecord) -> Self {
        Self {
            path: record.path.clone(),
            object_type: record.object_kind.to_string(),
            principal: record.principal.clone(),
            permissions: record.rights.to_string(),
            inherited: bool_text(record.is_inherited).to_string(),
            inheritance_flags: record.inheritance_flags.to_string(),
            propagation_flags: record.propagation_flags.to_string(),
            access_control_type: record.access_type.to_string(),
        }
    }
}

/// One line of the skipped-locations file.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct SkipRow<'a> {
    #[serde(rename = "Path")]
    path: &'a str,
    #[serde(rename = "Reason")]
    reason: &'a str,
    #[serde(rename = "TimeStamp")]
    timestamp: String,
    #[serde(rename = "ElapsedTime")]
    elapsed_time: String,
}

impl<'a> From<&'a SkipRecord> for SkipRow<'a> {
    fn from(skip: &'a SkipRecord) -> Self {
        Self {
            path: &skip.path,
            reason: &skip.reason,
            timestamp: skip.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            elapsed_time: format!("{:.2}", skip.elapsed_seconds),
        }
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Writes the report files of one scan into a directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    label: String,
    started_at: DateTime<Local>,
    timestamp_format: String,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, root: &Path, clock: &ScanClock) -> Self {
        Self {
            output_dir: output_dir.into(),
            label: report_label(root),
            started_at: clock.started_at(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn permissions_path(&self) -> PathBuf {
        self.file_path("permissions")
    }

    pub fn skips_path(&self) -> PathBuf {
        self.file_path("skipped")
    }

    fn file_path(&self, kind: &str) -> PathBuf {
        let stamp = self.started_at.format(&self.timestamp_format);
        self.output_dir
            .join(format!("{}-{}_{}.csv", self.label, kind, stamp))
    }

    /// Returns the written file, or `None` when there was nothing to write.
    pub fn write_permissions(&self, records: &[PermissionRecord]) -> Result<Option<PathBuf>> {
        if records.is_empty() {
            log::info!("No permission records, permissions report not written");
            return Ok(None);
        }

        let path = self.permissions_path();
        self.write_rows(&path, records.iter().map(PermissionRow::from))?;
        log::info!("Wrote {} permission records to {}", records.len(), path.display());
        Ok(Some(path))
    }

    pub fn write_skips(&self, skips: &[SkipRecord]) -> Result<Option<PathBuf>> {
        if skips.is_empty() {
            return Ok(None);
        }

        let path = self.skips_path();
        self.write_rows(&path, skips.iter().map(SkipRow::from))?;
        log::info!("Wrote {} skipped locations to {}", skips.len(), path.display());
        Ok(Some(path))
    }

    fn write_rows<S: Serialize>(&self, path: &Path, rows: impl Iterator<Item = S>) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;

        let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
        for row in rows {
            writer.serialize(row).map_err(|e| csv_error(path, e))?;
        }
        writer.flush()?;
        Ok(())
    }
}

pub(crate) fn csv_error(path: &Path, err: csv::Error) -> Error {
    Error::with_source(format!("CSV error in {}", path.display()), Box::new(err))
}

/// `X-drive` for a path on a lettered drive, otherwise the root's final
/// component.
pub fn report_label(root: &Path) -> String {
    let text = root.to_string_lossy();
    let mut chars = text.chars();
    if let (Some(letter), Some(':')) = (chars.next(), chars.next()) {
        if letter.is_ascii_alphabetic() {
            return format!("{}-drive", letter.to_ascii_uppercase());
        }
    }

    for component in root.components() {
        if let Component::Prefix(prefix) = component {
            if let Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) = prefix.kind() {
                return format!("{}-drive", (letter as char).to_ascii_uppercase());
            }
        }
    }

    root.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "root".to_string())
}

#[cfg(test)]
mod tests;
