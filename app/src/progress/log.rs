use std::path::Path;

use crate::progress::ProgressReporter;

/// Forwards progress to the `log` facade.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn scan_started(&self, root: &Path) {
        log::info!("[LogProgress] Scan started at {}", root.display());
    }

    fn scan_progress(&self, items_processed: u64, items_per_second: f64) {
        log::info!(
            "[LogProgress] {} items discovered ({:.1} items/s)",
            items_processed,
            items_per_second
        );
    }

    fn scan_finished(&self, objects: usize, skipped: usize) {
        log::info!(
            "[LogProgress] Scan finished: {} objects, {} skipped",
            objects,
            skipped
        );
    }

    fn extract_progress(&self, percent_complete: f64) {
        log::debug!("[LogProgress] Extraction {:.0}% complete", percent_complete);
    }

    fn extract_finished(&self, records: usize, skipped: usize) {
        log::info!(
            "[LogProgress] Extraction finished: {} records, {} skipped",
            records,
            skipped
        );
    }

    fn name(&self) -> &'static str {
        "log_progress"
    }
}
