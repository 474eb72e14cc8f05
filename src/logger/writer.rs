//! Log writer module
//!
//! Provides thread-safe log writing to files or stdout/stderr.
//! Log files can be reopened at runtime for rotation.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to stderr
    Stderr,
    /// Write to file
    File(File),
}

/// Thread-safe log writer
pub struct LogWriter {
    access_path: Option<String>,
    error_path: Option<String>,
    /// Access log target
    access: Mutex<LogTarget>,
    /// Error log target
    error: Mutex<LogTarget>,
}

impl LogWriter {
    /// Create a new log writer with optional file paths
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        let access = open_target(access_log_file, LogTarget::Stdout)?;
        let error = open_target(error_log_file, LogTarget::Stderr)?;

        Ok(Self {
            access_path: access_log_file.map(ToString::to_string),
            error_path: error_log_file.map(ToString::to_string),
            access: Mutex::new(access),
            error: Mutex::new(error),
        })
    }

    /// Write to access log
    pub fn write_access(&self, message: &str) {
        if let Ok(mut target) = self.access.lock() {
            write_to_target(&mut target, message);
        }
    }

    /// Write to error log
    pub fn write_error(&self, message: &str) {
        if let Ok(mut target) = self.error.lock() {
            write_to_target(&mut target, message);
        }
    }

    /// Write info message (to access log target)
    pub fn write_info(&self, message: &str) {
        self.write_access(message);
    }

    /// Reopen file targets at their configured paths (after log rotation)
    pub fn reopen(&self) -> io::Result<()> {
        let access = open_target(self.access_path.as_deref(), LogTarget::Stdout)?;
        let error = open_target(self.error_path.as_deref(), LogTarget::Stderr)?;
        if let Ok(mut target) = self.access.lock() {
            *target = access;
        }
        if let Ok(mut target) = self.error.lock() {
            *target = error;
        }
        Ok(())
    }
}

fn open_target(path: Option<&str>, fallback: LogTarget) -> io::Result<LogTarget> {
    match path {
        Some(p) => Ok(LogTarget::File(open_log_file(p)?)),
        None => Ok(fallback),
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write message to log target
fn write_to_target(target: &mut LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            let _ = writeln!(file, "{message}");
        }
    }
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has been called
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_targets_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let access = dir.path().join("logs/access.log");
        let error = dir.path().join("logs/error.log");
        let writer =
            LogWriter::new(access.to_str(), error.to_str()).unwrap();

        writer.write_access("GET /docs/index.html");
        writer.write_error("[ERROR] boom");

        // Simulate rotation: move the file away and reopen
        let rotated = dir.path().join("logs/access.log.1");
        std::fs::rename(&access, &rotated).unwrap();
        writer.reopen().unwrap();
        writer.write_info("after rotation");

        assert_eq!(
            std::fs::read_to_string(&rotated).unwrap(),
            "GET /docs/index.html\n"
        );
        assert_eq!(std::fs::read_to_string(&access).unwrap(), "after rotation\n");
        assert_eq!(std::fs::read_to_string(&error).unwrap(), "[ERROR] boom\n");
    }
}
