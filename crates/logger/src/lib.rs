//! Logging infrastructure for linedit.
//!
//! Installs a `log` facade backend that keeps the last N entries in memory
//! (for a debug panel) and appends them to an optional log file. Library
//! crates only ever use `log::debug!` and friends; before [`init`] those
//! calls go nowhere.

use chrono::Local;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Facade filter matching this level
    fn to_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            // Trace is folded into debug
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Logger state
#[derive(Debug)]
struct Logger {
    /// Debug log (last N messages)
    entries: VecDeque<LogEntry>,
    /// Maximum number of entries in log
    max_entries: usize,
    /// Minimum log level to record
    min_level: LogLevel,
    /// Log file path
    file_path: Option<PathBuf>,
}

impl Logger {
    /// Create new logger instance
    fn new(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) -> Self {
        if let Some(path) = &file_path {
            // Create parent directory if it doesn't exist
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }

            // Clear log file on startup
            if let Ok(mut file) = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
            {
                let _ = writeln!(file, "=== linedit log start ===");
            }
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            min_level,
            file_path,
        }
    }

    /// Add entry to log
    fn add_entry(&mut self, level: LogLevel, message: String) {
        // Filter by minimum level
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S").to_string();

        // Write to file (create if deleted)
        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().append(true).create(true).open(path) {
                let _ = writeln!(file, "[{}] {}: {}", timestamp, level.to_str(), message);
            }
        }

        self.entries.push_back(LogEntry {
            timestamp,
            level,
            message,
        });

        // Limit queue size
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Get all log entries
    fn get_entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Set minimum log level
    fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Bridge from the `log` facade to the global logger
struct FacadeLogger;

static FACADE: FacadeLogger = FacadeLogger;

impl log::Log for FacadeLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        LOGGER
            .get()
            .and_then(|logger| logger.lock().ok())
            .map(|logger| LogLevel::from(metadata.level()) >= logger.min_level)
            .unwrap_or(false)
    }

    fn log(&self, record: &log::Record) {
        if let Some(Ok(mut logger)) = LOGGER.get().map(|logger| logger.lock()) {
            logger.add_entry(record.level().into(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Initialize the global logger
///
/// Must be called once at application startup. Subsequent calls are
/// ignored, as is a failure to register with the `log` facade because
/// another logger was installed first.
///
/// # Arguments
///
/// * `file_path` - Path to the log file (`None` keeps logs in memory only)
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `min_level` - Minimum log level to record (Debug, Info, Warn, Error)
pub fn init(file_path: Option<PathBuf>, max_entries: usize, min_level: LogLevel) {
    let mut created = false;
    LOGGER.get_or_init(|| {
        created = true;
        Mutex::new(Logger::new(file_path, max_entries, min_level))
    });

    if created && log::set_logger(&FACADE).is_ok() {
        log::set_max_level(min_level.to_filter());
    }
}

/// Set minimum log level dynamically
///
/// Updates the minimum log level filter.
/// Logs below this level will be ignored.
pub fn set_min_level(level: LogLevel) {
    if let Some(Ok(mut logger)) = LOGGER.get().map(|logger| logger.lock()) {
        logger.set_min_level(level);
        log::set_max_level(level.to_filter());
    }
}

/// Get all log entries
///
/// Returns a vector of all log entries currently stored in memory.
/// Used by the debug panel to display logs.
pub fn get_entries() -> Vec<LogEntry> {
    match LOGGER.get().map(|logger| logger.lock()) {
        Some(Ok(logger)) => logger.get_entries(),
        _ => Vec::new(),
    }
}
