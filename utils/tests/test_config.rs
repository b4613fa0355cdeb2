use std::sync::{Mutex, MutexGuard};

use utils::app_config::*;

// AppConfig is process global; tests in this file take turns.
static CONFIG_LOCK: Mutex<()> = Mutex::new(());

pub fn initialize() -> MutexGuard<'static, ()> {
    let guard = CONFIG_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    // Reset to original test configuration
    let config_contents = include_str!("resources/test_config.toml");
    AppConfig::init(Some(config_contents)).unwrap();

    guard
}

#[test]
fn fetch_config() {
    let _guard = initialize();

    let config = AppConfig::fetch().unwrap();

    assert_eq!(config.log.level, "info");
    assert_eq!(config.log.dir, "logs");
    assert_eq!(config.log.file, "test.log");

    assert_eq!(config.scan.progress_interval, 50);
    assert!(config.scan.include_inherited);
    assert!(!config.scan.include_system);
    assert!(!config.scan.include_builtin);

    assert_eq!(config.classifier.users_root, r"D:\Profiles");
    assert_eq!(config.classifier.os_root, r"D:\Windows");
    assert_eq!(config.classifier.program_data_root, r"D:\ProgramData");
    assert_eq!(
        config.classifier.extra_exclusions,
        vec!["node_modules".to_string(), "Thumbs.db".to_string()]
    );

    assert_eq!(config.report.output_dir, "reports");
    assert_eq!(config.report.timestamp_format, "%Y%m%d_%H%M%S");
}

#[test]
fn verify_get() {
    let _guard = initialize();

    assert_eq!(AppConfig::get::<String>("log.level").unwrap(), "info");
    assert_eq!(AppConfig::get::<u64>("scan.progress_interval").unwrap(), 50);
    assert!(AppConfig::get::<bool>("scan.include_inherited").unwrap());
    assert_eq!(
        AppConfig::get::<String>("classifier.users_root").unwrap(),
        r"D:\Profiles"
    );
    assert_eq!(
        AppConfig::get::<String>("report.output_dir").unwrap(),
        "reports"
    );
}

#[test]
fn verify_set() {
    let _guard = initialize();

    AppConfig::set("log.level", "debug").unwrap();
    AppConfig::set("scan.progress_interval", "250").unwrap();
    AppConfig::set("scan.include_builtin", "true").unwrap();
    AppConfig::set("report.output_dir", "/var/tmp/audit").unwrap();

    let config = AppConfig::fetch().unwrap();

    assert_eq!(config.log.level, "debug");
    assert_eq!(config.scan.progress_interval, 250);
    assert!(config.scan.include_builtin);
    assert_eq!(config.report.output_dir, "/var/tmp/audit");
}

#[test]
fn merge_config_file_overrides_defaults() {
    let _guard = initialize();

    let dir = tempfile::tempdir().unwrap();
    let override_path = dir.path().join("override.toml");
    std::fs::write(
        &override_path,
        "[classifier]\nos_root = 'E:\\WINNT'\n\n[scan]\nprogress_interval = 10\n",
    )
    .unwrap();

    AppConfig::merge_config(Some(&override_path)).unwrap();
    let config = AppConfig::fetch().unwrap();

    assert_eq!(config.classifier.os_root, r"E:\WINNT");
    assert_eq!(config.scan.progress_interval, 10);
    // untouched keys keep their values
    assert_eq!(config.classifier.users_root, r"D:\Profiles");
}

#[test]
fn merge_config_without_file_is_noop() {
    let _guard = initialize();

    AppConfig::merge_config(None).unwrap();
    let config = AppConfig::fetch().unwrap();
    assert_eq!(config.scan.progress_interval, 50);
}

#[test]
fn test_nested_configuration_access() {
    let _guard = initialize();

    let log_config = AppConfig::get::<LogConfig>("log").unwrap();
    assert_eq!(log_config.level, "info");

    let classifier = AppConfig::get::<ClassifierConfig>("classifier").unwrap();
    assert_eq!(classifier.extra_exclusions.len(), 2);

    let report = AppConfig::get::<ReportConfig>("report").unwrap();
    assert_eq!(report.timestamp_format, "%Y%m%d_%H%M%S");
}

#[test]
fn missing_key_is_an_error() {
    let _guard = initialize();

    assert!(AppConfig::get::<String>("scan.does_not_exist").is_err());
}
