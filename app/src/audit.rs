//! End-to-end audit run: enumerate, read ACLs, export.

use std::path::PathBuf;

use storage::{AclReader, DirectoryLister, LocalStorage, NativeAclReader};
use utils::app_config::AppConfig;
use utils::error::Result;

use crate::classifier::PathClassifier;
use crate::extract::{ExtractOptions, PermissionExtractor};
use crate::model::{ScanClock, SkipRecord};
use crate::progress::ProgressReporter;
use crate::report::{ReportWriter, DEFAULT_TIMESTAMP_FORMAT};
use crate::scan::{TreeScanner, DEFAULT_PROGRESS_INTERVAL};


/// What to audit and which entries to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    pub root: PathBuf,
    pub options: ExtractOptions,
}

/// Supplies the scan root and inclusion flags, from flags or from a person.
pub trait InputProvider {
    fn request(&mut self) -> Result<AuditRequest>;
}

/// A request that is already known.
impl InputProvider for AuditRequest {
    fn request(&mut self) -> Result<AuditRequest> {
        Ok(self.clone())
    }
}

/// How an audit run ended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditSummary {
    pub objects_scanned: usize,
    pub records: usize,
    pub skipped: usize,
    pub permissions_report: Option<PathBuf>,
    pub skip_report: Option<PathBuf>,
}

impl AuditSummary {
    /// No permission record passed the filters, so no permissions file exists.
    pub fn nothing_to_export(&self) -> bool {
        self.permissions_report.is_none()
    }
}

pub struct Auditor {
    classifier: PathClassifier,
    progress_interval: u64,
    output_dir: PathBuf,
    timestamp_format: String,
}

impl Auditor {
    pub fn new(classifier: PathClassifier, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            classifier,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            output_dir: output_dir.into(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            PathClassifier::from_config(&config.classifier),
            &config.report.output_dir,
        )
        .with_progress_interval(config.scan.progress_interval)
        .with_timestamp_format(&config.report.timestamp_format)
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_timestamp_format(mut self, format: &str) -> Self {
        self.timestamp_format = format.to_string();
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Both phases' skips in order, without any that classify as system paths.
    pub fn reportable_skips(
        &self, scan_skips: Vec<SkipRecord>, extract_skips: Vec<SkipRecord>,
    ) -> Vec<SkipRecord> {
        scan_skips
            .into_iter()
            .chain(extract_skips)
            .filter(|skip| !self.classifier.is_system_path(&skip.path))
            .collect()
    }

    /// Audit the local filesystem with the host's native ACL reader.
    pub fn run(&self, request: &AuditRequest, progress: &dyn ProgressReporter) -> Result<AuditSummary> {
        self.run_with(LocalStorage::new(), NativeAclReader::new(), request, progress)
    }

    pub fn run_with<L: DirectoryLister, R: AclReader>(
        &self, lister: L, reader: R, request: &AuditRequest, progress: &dyn ProgressReporter,
    ) -> Result<AuditSummary> {
        let clock = ScanClock::start();
        log::info!(
            "Starting audit of {} (inherited: {}, system: {}, builtin: {})",
            request.root.display(),
            request.options.include_inherited,
            request.options.include_system,
            request.options.include_builtin
        );

        let scanned = TreeScanner::new(lister, &self.classifier, progress)
            .with_progress_interval(self.progress_interval)
            .scan(&request.root, &clock)?;

        let extracted = PermissionExtractor::new(reader, &self.classifier, request.options, progress)
            .extract(&scanned.objects, &clock);

        let skips = self.reportable_skips(scanned.skips, extracted.skips);

        let writer = ReportWriter::new(&self.output_dir, &request.root, &clock)
            .with_timestamp_format(self.timestamp_format.as_str());
        let permissions_report = writer.write_permissions(&extracted.records)?;
        let skip_report = writer.write_skips(&skips)?;

        let summary = AuditSummary {
            objects_scanned: scanned.objects.len(),
            records: extracted.records.len(),
            skipped: skips.len(),
            permissions_report,
            skip_report,
        };

        if summary.nothing_to_export() {
            log::info!("Audit of {} finished, nothing found to export", request.root.display());
        } else {
            log::info!(
                "Audit of {} finished in {:.2}s: {} records, {} skipped",
                request.root.display(),
                clock.elapsed_seconds(),
                summary.records,
                summary.skipped
            );
        }

        Ok(summary)
    }
}
