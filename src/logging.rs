//! Logging setup for devsetup.
//!
//! Warnings always go to stderr, even when no log file can be opened. Full run logs are written to
//! ~/.devsetup/logs/ and pruned after the retention period.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Default log retention in hours.
pub const DEFAULT_LOG_RETENTION_HOURS: u32 = 24;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log retention period in hours.
    pub retention_hours: u32,
    /// Log level (trace, debug, info, warn, error, off).
    pub level: String,
    /// Whether the log file is written.
    pub enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            retention_hours: DEFAULT_LOG_RETENTION_HOURS,
            level: DEFAULT_LOG_LEVEL.to_string(),
            enabled: true,
        }
    }
}

impl LogConfig {
    /// Parses log level from string.
    #[must_use]
    pub fn parse_level(value: &str) -> String {
        match value.to_lowercase().as_str() {
            "trace" => "trace".to_string(),
            "debug" => "debug".to_string(),
            "info" => "info".to_string(),
            "warn" | "warning" => "warn".to_string(),
            "error" => "error".to_string(),
            "off" | "none" | "disabled" => "off".to_string(),
            _ => DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Parses retention hours from string.
    #[must_use]
    pub fn parse_retention(value: &str) -> u32 {
        value.parse().unwrap_or(DEFAULT_LOG_RETENTION_HOURS)
    }

    /// Returns true if a log file should be written.
    #[must_use]
    pub fn writes_file(&self) -> bool {
        self.enabled && self.level != "off"
    }
}

/// Returns the log directory path (~/.devsetup/logs/).
#[must_use]
pub fn log_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".devsetup")
        .join("logs")
}

/// Returns the file name for a log started now.
#[must_use]
pub fn current_log_name() -> String {
    let now = chrono::Local::now();
    format!("devsetup_{}.log", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Deletes `.log` files in `log_dir` older than the retention period.
///
/// # Errors
/// Returns error if the directory cannot be read.
pub fn cleanup_old_logs(log_dir: &Path, retention_hours: u32) -> io::Result<u32> {
    if !log_dir.exists() {
        return Ok(0);
    }

    let retention = Duration::from_secs(u64::from(retention_hours) * 3600);
    let now = SystemTime::now();
    let mut deleted_count = 0;

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("log") {
            continue;
        }

        let age = entry
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());

        if let Some(age) = age {
            if age > retention && fs::remove_file(&path).is_ok() {
                deleted_count += 1;
            }
        }
    }

    Ok(deleted_count)
}

/// Returns true for events the stderr layer prints.
///
/// Errors are left out: `main` prints the fatal error itself.
fn shows_on_console(level: Level) -> bool {
    level == Level::WARN
}

/// An opened log file, ready to back the file layer.
struct LogFile {
    path: PathBuf,
    appender: RollingFileAppender,
    deleted: u32,
}

/// Creates `log_dir`, prunes old logs and opens a new log file in it.
fn open_log_file(log_dir: &Path, retention_hours: u32) -> io::Result<LogFile> {
    fs::create_dir_all(log_dir)?;
    let deleted = cleanup_old_logs(log_dir, retention_hours)?;

    let name = current_log_name();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&name)
        .build(log_dir)
        .map_err(io::Error::other)?;

    Ok(LogFile {
        path: log_dir.join(name),
        appender,
        deleted,
    })
}

/// Initializes the logging system.
///
/// The stderr layer only shows warnings; progress text and the final error
/// are printed separately. The file layer records the whole run at the
/// configured level.
///
/// The subscriber is installed even when the log file cannot be opened, so
/// warnings still reach stderr.
///
/// # Errors
/// Returns the error that kept the log file from opening. Logging to stderr
/// is active regardless.
pub fn init(config: &LogConfig) -> io::Result<()> {
    init_in(config, &log_directory())
}

fn init_in(config: &LogConfig, log_dir: &Path) -> io::Result<()> {
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(filter::filter_fn(|meta| shows_on_console(*meta.level())));

    let (log_file, file_error) = if config.writes_file() {
        match open_log_file(log_dir, config.retention_hours) {
            Ok(file) => (Some(file), None),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    let mut log_path = None;
    let mut deleted = 0;
    let file_layer = log_file.map(|file| {
        log_path = Some(file.path);
        deleted = file.deleted;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
        fmt::layer()
            .with_writer(file.appender)
            .with_ansi(false)
            .with_target(true)
            .with_filter(filter)
    });

    if tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global subscriber already installed");
    }

    if let Some(path) = log_path {
        tracing::info!("devsetup v{} logging initialized", env!("CARGO_PKG_VERSION"));
        tracing::info!("Log file: {}", path.display());
        tracing::info!("Log level: {}", config.level);
        if deleted > 0 {
            tracing::info!("Cleaned up {} old log file(s)", deleted);
        }
    }

    match file_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
