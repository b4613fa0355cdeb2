use std::path::Path;

use crate::progress::ProgressReporter;

/// Prints timestamped progress lines to stdout.
pub struct ConsoleProgress;

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl ProgressReporter for ConsoleProgress {
    fn scan_started(&self, root: &Path) {
        println!("[{}] Scanning {} ...", now(), root.display());
    }

    fn scan_progress(&self, items_processed: u64, items_per_second: f64) {
        println!(
            "[{}] Scan progress: {} items ({:.1} items/s)",
            now(),
            items_processed,
            items_per_second
        );
    }

    fn scan_finished(&self, objects: usize, skipped: usize) {
        println!(
            "[{}] Scan finished: {} objects, {} skipped",
            now(),
            objects,
            skipped
        );
    }

    fn extract_progress(&self, percent_complete: f64) {
        println!(
            "[{}] Reading permissions: {:.0}% complete",
            now(),
            percent_complete
        );
    }

    fn extract_finished(&self, records: usize, skipped: usize) {
        println!(
            "[{}] Permissions read: {} records, {} skipped",
            now(),
            records,
            skipped
        );
    }

    fn name(&self) -> &'static str {
        "console_progress"
    }
}
