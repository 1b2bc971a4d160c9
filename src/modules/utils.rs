use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tauri::{AppHandle, Emitter};

#[derive(Serialize, Deserialize)]
pub struct LogMessage {
    pub level: String,
    pub message: String,
    pub timestamp: String,
}

pub fn send_log(app: &AppHandle, level: &str, message: &str) {
    let log_message = LogMessage {
        level: level.to_string(),
        message: message.to_string(),
        timestamp: Local::now().format("%H:%M:%S").to_string(),
    };

    if let Err(e) = app.emit("log_message", &log_message) {
        eprintln!("Failed to emit log message: {}", e);
    }

    // Also print to console
    eprintln!(
        "[{}] {}: {}",
        log_message.timestamp,
        level.to_uppercase(),
        message
    );
}

pub fn config_dir() -> Result<PathBuf, String> {
    dirs::config_dir()
        .ok_or_else(|| "Could not find config directory".to_string())
        .map(|dir| dir.join("soulspace"))
}

/// Streaks and windows work on local calendar days.
pub fn local_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
