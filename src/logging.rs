//! Structured logging for the personalization engine
//!
//! Writes logs to ~/.innerlight/logs/ with categories:
//! - SOURCES: Source reader fetches and degradations
//! - ANALYSIS: Analyzer outputs
//! - SNAPSHOT: Snapshot computation and republication
//! - ERROR: Errors and fallbacks

use chrono::{Local, Utc};
use once_cell::sync::Lazy;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Log categories for structured logging
#[derive(Debug, Clone, Copy)]
pub enum LogCategory {
    Sources,  // Source reader fetches and empty-default degradations
    Analysis, // Analyzer outputs
    Snapshot, // Snapshot computation, cache hits, republication
    Error,    // Errors and fallbacks
}

impl LogCategory {
    fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Sources => "SOURCES",
            LogCategory::Analysis => "ANALYSIS",
            LogCategory::Snapshot => "SNAPSHOT",
            LogCategory::Error => "ERROR",
        }
    }
}

/// Global log file handle
static LOG_FILE: Lazy<Mutex<Option<PathBuf>>> = Lazy::new(|| Mutex::new(None));

/// Get the log directory path
fn get_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".innerlight/logs")
}

/// Get today's log file path
fn get_log_file_path() -> PathBuf {
    let today = Local::now().format("%Y-%m-%d").to_string();
    get_log_dir().join(format!("innerlight-{}.log", today))
}

/// Initialize the logging system - creates log directory if needed
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = get_log_dir();

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    let log_path = get_log_file_path();
    *LOG_FILE.lock().unwrap() = Some(log_path.clone());

    log(LogCategory::Snapshot, None, "Innerlight logging initialized");

    Ok(())
}

/// Log a message with category and optional user context
pub fn log(category: LogCategory, user_id: Option<&str>, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let user_context = user_id
        .map(|id| format!("user={} | ", &id[..8.min(id.len())]))
        .unwrap_or_default();

    let log_line = format!(
        "[{}] [{}] {}{}\n",
        timestamp,
        category.as_str(),
        user_context,
        message
    );

    // Always print to console (for dev)
    print!("{}", log_line);

    let log_path = get_log_file_path();
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = file.write_all(log_line.as_bytes());
    }
}

/// Log a source fetch event (loaded counts, empty-default degradations)
pub fn log_sources(user_id: Option<&str>, message: &str) {
    log(LogCategory::Sources, user_id, message);
}

/// Log an analyzer result
pub fn log_analysis(user_id: Option<&str>, message: &str) {
    log(LogCategory::Analysis, user_id, message);
}

/// Log a snapshot lifecycle event (compute, cache hit, republish)
pub fn log_snapshot(user_id: Option<&str>, message: &str) {
    log(LogCategory::Snapshot, user_id, message);
}

/// Log an error
pub fn log_error(user_id: Option<&str>, message: &str) {
    log(LogCategory::Error, user_id, message);
}

/// Clean up old log files (keep last 7 days)
pub fn cleanup_old_logs() -> Result<usize, Box<dyn std::error::Error>> {
    let log_dir = get_log_dir();
    let mut deleted = 0;

    if !log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Utc::now() - chrono::Duration::days(7);

    for entry in fs::read_dir(&log_dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Ok(metadata) = entry.metadata() {
            if let Ok(modified) = metadata.modified() {
                let modified_time: chrono::DateTime<Utc> = modified.into();
                if modified_time < cutoff {
                    if fs::remove_file(&path).is_ok() {
                        deleted += 1;
                    }
                }
            }
        }
    }

    Ok(deleted)
}
