//! File-based logging facade
//!
//! Library code must stay off stdout and stderr: validator hosts own those
//! streams. The facade is a no-op until a host opts in by pointing it at a
//! file.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<Option<File>>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
        }
    }
}

/// Start appending log lines to `path`. The first initialization wins.
pub fn init_file_logging(path: impl Into<PathBuf>) {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.into())
        .ok();
    let _ = LOG_FILE.set(Mutex::new(file));
}

/// Start logging to the default file under the system temp directory.
pub fn init_default_logging() {
    init_file_logging(std::env::temp_dir().join("txscript.log"));
}

/// Append one line; silently dropped when logging is not initialized.
pub fn log(level: LogLevel, component: &str, message: &str) {
    let Some(mutex) = LOG_FILE.get() else {
        return;
    };
    if let Ok(mut guard) = mutex.lock() {
        if let Some(ref mut file) = *guard {
            let _ = writeln!(file, "{} {} {}: {}", unix_millis(), level, component, message);
            let _ = file.flush();
        }
    }
}

fn unix_millis() -> u128 {
    use std::time::SystemTime;
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0)
}

/// Log from evaluation entry points.
#[macro_export]
macro_rules! eval_log {
    ($($arg:tt)*) => {
        $crate::logging::log(
            $crate::logging::LogLevel::Debug,
            "eval",
            &format!($($arg)*),
        )
    };
}
