pub mod audit;
pub mod classifier;
pub mod extract;
pub mod model;
pub mod progress;
pub mod report;
pub mod scan;

/// Commonly used types, importable with `use app::prelude::*`.
pub mod prelude {
    pub use crate::audit::{AuditRequest, AuditSummary, Auditor, InputProvider};
    pub use crate::classifier::PathClassifier;
    pub use crate::extract::{ExtractOptions, PermissionExtractor};
    pub use crate::model::{FilesystemObject, PermissionRecord, ScanClock, SkipRecord};
    pub use crate::progress::{ProgressConfig, ProgressManager, ProgressReporter};
    pub use crate::report::{PermissionReport, ReportWriter};
    pub use crate::scan::TreeScanner;
}
