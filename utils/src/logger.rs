use slog::o;
use slog::Drain;
use slog::Level;
use slog::LevelFilter;
#[cfg(all(target_os = "linux", feature = "journald"))]
use slog_journald::JournaldDrain;
#[cfg(feature = "syslog")]
use slog_syslog::Facility;

use std::fs::OpenOptions;
use std::path::PathBuf;

use super::error::Result;
use crate::app_config::{AppConfig, LogConfig};

const CHANNEL_SIZE: usize = 1024;

pub fn setup_logging() -> Result<slog_scope::GlobalLoggerGuard> {
    let guard = slog_scope::set_global_logger(default_root_logger()?);
    slog_stdlog::init()?;

    Ok(guard)
}

pub fn default_root_logger() -> Result<slog::Logger> {
    let log_config = AppConfig::get::<LogConfig>("log").ok();
    let log_level = log_config
        .as_ref()
        .map(|c| parse_level(&c.level))
        .unwrap_or(Level::Info);

    let term_drain = default_term_drain().unwrap_or(default_discard()?);
    let file_drain = default_file_drain(log_config.as_ref()).unwrap_or(default_discard()?);

    let drain = slog::Duplicate(term_drain, file_drain).fuse();

    #[cfg(feature = "syslog")]
    let drain = slog::Duplicate(default_syslog_drain().unwrap_or(default_discard()?), drain).fuse();
    #[cfg(feature = "journald")]
    #[cfg(target_os = "linux")]
    let drain = slog::Duplicate(
        default_journald_drain().unwrap_or(default_discard()?),
        drain,
    )
    .fuse();

    let drain = LevelFilter::new(drain, log_level).fuse();

    Ok(slog::Logger::root(drain, o!()))
}

/// Map a configured level name onto a slog level. Unknown names fall back to info.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" | "warning" => Level::Warning,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

fn default_discard() -> Result<slog_async::Async> {
    let drain = slog_async::Async::new(slog::Discard)
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

// term drain: Log to Terminal
#[cfg(not(feature = "termlog"))]
fn default_term_drain() -> Result<slog_async::Async> {
    let plain = slog_term::PlainSyncDecorator::new(std::io::stderr());
    let term = slog_term::FullFormat::new(plain)
        .use_custom_timestamp(slog_term::timestamp_local);

    let drain = slog_async::Async::new(term.build().fuse())
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

// term drain: Log to Terminal, with colours and source locations
#[cfg(feature = "termlog")]
fn default_term_drain() -> Result<slog_async::Async> {
    let decorator = slog_term::TermDecorator::new().stderr().build();
    let term = slog_term::FullFormat::new(decorator)
        .use_file_location()
        .use_custom_timestamp(slog_term::timestamp_local);

    let drain = slog_async::Async::new(term.build().fuse())
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

/// Resolve the log directory: absolute paths are used as is, relative ones
/// hang off the executable's directory (or the working directory as a fallback).
fn resolve_log_dir(log_config: Option<&LogConfig>) -> Result<PathBuf> {
    let configured = log_config
        .map(|c| PathBuf::from(&c.dir))
        .unwrap_or_else(|| PathBuf::from("logs"));

    if configured.is_absolute() {
        return Ok(configured);
    }

    let mut base = std::env::current_exe()?;
    base.pop();
    if !base.exists() {
        base = std::env::current_dir()?;
    }

    Ok(base.join(configured))
}

// file drain: Log to file
fn default_file_drain(log_config: Option<&LogConfig>) -> Result<slog_async::Async> {
    let log_dir = resolve_log_dir(log_config)?;
    std::fs::create_dir_all(&log_dir)?;

    let file_name = log_config
        .map(|c| c.file.clone())
        .unwrap_or_else(|| "acl-audit.log".to_string());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(file_name))?;

    let decorator = slog_term::PlainSyncDecorator::new(file);
    let formatter = slog_term::FullFormat::new(decorator)
        .use_file_location()
        .use_custom_timestamp(slog_term::timestamp_local)
        .build()
        .fuse();

    let drain = slog_async::Async::new(formatter)
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

// syslog drain: Log to syslog
#[cfg(feature = "syslog")]
fn default_syslog_drain() -> Result<slog_async::Async> {
    let syslog = slog_syslog::unix_3164(Facility::LOG_USER)?;

    let drain = slog_async::Async::new(syslog.fuse())
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn default_journald_drain() -> Result<slog_async::Async> {
    let journald = JournaldDrain.ignore_res();
    let drain = slog_async::Async::new(journald)
        .chan_size(CHANNEL_SIZE)
        .build();

    Ok(drain)
}
