use std::path::Path;
use std::sync::RwLock;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use super::error::Result;

lazy_static! {
    static ref BUILDER: RwLock<ConfigBuilder<DefaultState>> = RwLock::new(Config::builder());
}

/// Environment variables with this prefix override configuration keys,
/// e.g. `ACL_AUDIT_LOG__LEVEL=debug`.
const ENV_PREFIX: &str = "ACL_AUDIT";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
    /// Log directory. Relative paths are resolved against the executable's directory.
    pub dir: String,
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScanConfig {
    /// Number of discovered items between two progress notifications.
    pub progress_interval: u64,
    pub include_inherited: bool,
    pub include_system: bool,
    pub include_builtin: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassifierConfig {
    pub users_root: String,
    pub os_root: String,
    pub program_data_root: String,
    #[serde(default)]
    pub extra_exclusions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReportConfig {
    pub output_dir: String,
    pub timestamp_format: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log: LogConfig,
    pub scan: ScanConfig,
    pub classifier: ClassifierConfig,
    pub report: ReportConfig,
}

impl AppConfig {
    /// Initialize AppConfig from the embedded defaults plus environment overrides.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        if let Some(contents) = default_config {
            builder = builder.add_source(File::from_str(contents, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let mut guard = BUILDER.write()?;
        *guard = builder;

        Ok(())
    }

    /// Layer a user supplied configuration file over the current settings.
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        if let Some(path) = config_file {
            let mut guard = BUILDER.write()?;
            *guard = guard.clone().add_source(File::from(path));
        }

        Ok(())
    }

    /// Override a single key at runtime.
    pub fn set(key: &str, value: &str) -> Result<()> {
        let mut guard = BUILDER.write()?;
        *guard = guard.clone().set_override(key, value)?;

        Ok(())
    }

    pub fn get<'de, T>(key: &str) -> Result<T>
    where
        T: serde::Deserialize<'de>,
    {
        Ok(BUILDER.read()?.build_cloned()?.get::<T>(key)?)
    }

    pub fn fetch() -> Result<AppConfig> {
        let config = BUILDER.read()?.build_cloned()?;
        Ok(config.try_deserialize::<AppConfig>()?)
    }
}
