pub mod analytics;
pub mod app_state;
pub mod audio_recorder;
pub mod board_editor;
pub mod database;
pub mod models;
pub mod notifications;
pub mod speech;
pub mod storage;
pub mod tauri_commands;
pub mod utils;
