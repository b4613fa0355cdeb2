use serde::{Deserialize, Serialize};

/// Which progress reporters an audit run notifies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Timestamped lines on stdout
    pub enable_console: bool,
    /// `log` records, picked up by the slog file drain
    pub enable_log: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self::log_only()
    }
}

impl ProgressConfig {
    pub fn new(enable_console: bool, enable_log: bool) -> Self {
        Self {
            enable_console,
            enable_log,
        }
    }

    pub fn log_only() -> Self {
        Self::new(false, true)
    }

    pub fn all_enabled() -> Self {
        Self::new(true, true)
    }

    pub fn silent() -> Self {
        Self::new(false, false)
    }
}
