use std::path::Path;

pub mod config;
mod console;
mod log;

pub use self::config::ProgressConfig;
pub use self::console::ConsoleProgress;
pub use self::log::LogProgress;

/// Receives purely observational notifications while an audit runs.
pub trait ProgressReporter: Send {
    fn scan_started(&self, _root: &Path) {}

    /// Called every `progress_interval` discovered items.
    fn scan_progress(&self, items_processed: u64, items_per_second: f64);

    fn scan_finished(&self, _objects: usize, _skipped: usize) {}

    /// Called whenever the whole-number completion percentage changes.
    fn extract_progress(&self, percent_complete: f64);

    fn extract_finished(&self, _records: usize, _skipped: usize) {}

    fn name(&self) -> &'static str;
}

/// Fans every notification out to the configured reporters.
pub struct ProgressManager {
    reporters: Vec<Box<dyn ProgressReporter>>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::with_config(&ProgressConfig::default())
    }
}

impl ProgressManager {
    pub fn new(enable_console: bool) -> Self {
        Self::with_config(&ProgressConfig::new(enable_console, true))
    }

    pub fn with_config(config: &ProgressConfig) -> Self {
        let mut manager = Self {
            reporters: Vec::new(),
        };

        if config.enable_log {
            manager.add_reporter(Box::new(LogProgress));
        }
        if config.enable_console {
            manager.add_reporter(Box::new(ConsoleProgress));
        }

        manager
    }

    pub fn add_reporter(&mut self, reporter: Box<dyn ProgressReporter>) {
        ::log::debug!("Registered progress reporter {}", reporter.name());
        self.reporters.push(reporter);
    }

    pub fn get_reporter_count(&self) -> usize {
        self.reporters.len()
    }
}

impl ProgressReporter for ProgressManager {
    fn scan_started(&self, root: &Path) {
        self.reporters.iter().for_each(|r| r.scan_started(root));
    }

    fn scan_progress(&self, items_processed: u64, items_per_second: f64) {
        self.reporters
            .iter()
            .for_each(|r| r.scan_progress(items_processed, items_per_second));
    }

    fn scan_finished(&self, objects: usize, skipped: usize) {
        self.reporters
            .iter()
            .for_each(|r| r.scan_finished(objects, skipped));
    }

    fn extract_progress(&self, percent_complete: f64) {
        self.reporters
            .iter()
            .for_each(|r| r.extract_progress(percent_complete));
    }

    fn extract_finished(&self, records: usize, skipped: usize) {
        self.reporters
            .iter()
            .for_each(|r| r.extract_finished(records, skipped));
    }

    fn name(&self) -> &'static str {
        "progress_manager"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recording(Arc<Mutex<Vec<String>>>);

    impl ProgressReporter for Recording {
        fn scan_progress(&self, items_processed: u64, _items_per_second: f64) {
            self.0.lock().unwrap().push(format!("scan {items_processed}"));
        }

        fn extract_progress(&self, percent_complete: f64) {
            self.0.lock().unwrap().push(format!("extract {percent_complete:.0}"));
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    #[test]
    fn reporter_count_follows_config() {
        assert_eq!(
            ProgressManager::with_config(&ProgressConfig::silent()).get_reporter_count(),
            0
        );
        assert_eq!(
            ProgressManager::with_config(&ProgressConfig::log_only()).get_reporter_count(),
            1
        );
        assert_eq!(
            ProgressManager::with_config(&ProgressConfig::all_enabled()).get_reporter_count(),
            2
        );
        assert_eq!(ProgressManager::new(true).get_reporter_count(), 2);
    }

    #[test]
    fn manager_fans_out_to_every_reporter() {
        let first = Arc::new(Mutex::new(Vec::new()));
        let second = Arc::new(Mutex::new(Vec::new()));

        let mut manager = ProgressManager::with_config(&ProgressConfig::silent());
        manager.add_reporter(Box::new(Recording(first.clone())));
        manager.add_reporter(Box::new(Recording(second.clone())));

        manager.scan_progress(100, 12.5);
        manager.extract_progress(42.0);

        let expected = vec!["scan 100".to_string(), "extract 42".to_string()];
        assert_eq!(*first.lock().unwrap(), expected);
        assert_eq!(*second.lock().unwrap(), expected);
    }
}
