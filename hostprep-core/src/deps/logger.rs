//! Installation log file
//!
//! Mirrors every install step and its captured output into a timestamped
//! file so a failed bootstrap can be inspected after the terminal is gone.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const LOG_PREFIX: &str = "hostprep-install-";
const LOG_SUFFIX: &str = ".log";

/// Number of install logs kept in the log directory
pub const KEEP_LOGS: usize = 5;

/// Append-only log of a single install run
pub struct InstallLogger {
    file: File,
    log_path: PathBuf,
}

impl InstallLogger {
    /// Creates a timestamped log file in `dir` and writes the header
    pub fn create(dir: &Path) -> io::Result<Self> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("{}{}{}", LOG_PREFIX, timestamp, LOG_SUFFIX));

        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

        let logger = Self { file, log_path };
        logger.info("=== hostprep dependency installation log ===");
        logger.info(&format!("Version: {}", env!("CARGO_PKG_VERSION")));
        logger.info(&format!(
            "Started: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        Ok(logger)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn info(&self, message: &str) {
        self.log_message("INFO", message);
    }

    pub fn warn(&self, message: &str) {
        self.log_message("WARN", message);
    }

    pub fn error(&self, message: &str) {
        self.log_message("ERROR", message);
    }

    /// Records captured command output, one line per entry
    pub fn log_output(&self, stream: &str, output: &str) {
        for line in output.lines() {
            self.log_message("", &format!("  {}: {}", stream, line));
        }
    }

    fn log_message(&self, level: &str, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let formatted = if level.is_empty() {
            format!("[{}] {}", timestamp, message)
        } else {
            format!("[{}] [{}] {}", timestamp, level, message)
        };

        // Log file failures must never abort an install
        let mut file = &self.file;
        let _ = writeln!(file, "{}", formatted);
    }

    /// Writes the trailer and flushes
    pub fn finalize(&self) {
        self.info(&format!(
            "Finished: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        let mut file = &self.file;
        let _ = file.flush();
    }

    /// Removes all but the newest `keep_count` install logs in `dir`
    ///
    /// Log names embed a sortable timestamp, so name order is age order.
    pub fn cleanup_old_logs(dir: &Path, keep_count: usize) -> io::Result<usize> {
        let mut log_files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(LOG_PREFIX) && n.ends_with(LOG_SUFFIX))
                    .unwrap_or(false)
            })
            .collect();

        log_files.sort();

        let mut removed = 0;
        if log_files.len() > keep_count {
            let to_remove = log_files.len() - keep_count;
            for path in log_files.iter().take(to_remove) {
                if std::fs::remove_file(path).is_ok() {
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }
}
