use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::modules::audio_recorder::AudioRecorder;
use crate::modules::board_editor::BoardEditor;
use crate::modules::database::JournalDatabase;
use crate::modules::notifications::{self, NotificationSettings};
use crate::modules::speech::PlaybackSlot;
use crate::modules::utils::config_dir;

const SESSION_FILE: &str = "session.txt";

pub struct AppState {
    pub db: Arc<JournalDatabase>,
    pub current_user: Arc<Mutex<Option<String>>>,
    pub notification_settings: Arc<Mutex<NotificationSettings>>,
    pub recorder: Arc<Mutex<AudioRecorder>>,
    pub playback: Arc<Mutex<PlaybackSlot>>,
    pub editor: Arc<Mutex<BoardEditor>>,
    pub last_reminder_date: Arc<Mutex<Option<NaiveDate>>>,
    pub last_quote_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    pub quote_counter: Arc<Mutex<usize>>,
}

impl AppState {
    pub async fn new() -> Result<Self, String> {
        let db_path = config_dir()?.join("journal.db");
        std::fs::create_dir_all(db_path.parent().unwrap()).map_err(|e| e.to_string())?;

        let db = Arc::new(JournalDatabase::new(db_path.to_str().unwrap()).await?);

        let settings = notifications::load_settings().unwrap_or_default();
        let session = Self::load_session();

        Ok(Self {
            db,
            current_user: Arc::new(Mutex::new(session)),
            notification_settings: Arc::new(Mutex::new(settings)),
            recorder: Arc::new(Mutex::new(AudioRecorder::new())),
            playback: Arc::new(Mutex::new(PlaybackSlot::default())),
            editor: Arc::new(Mutex::new(BoardEditor::default())),
            last_reminder_date: Arc::new(Mutex::new(None)),
            last_quote_time: Arc::new(Mutex::new(None)),
            quote_counter: Arc::new(Mutex::new(0)),
        })
    }

    /// Identity of the signed-in user, required by every data operation.
    pub async fn require_user(&self) -> Result<String, String> {
        self.current_user
            .lock()
            .await
            .clone()
            .ok_or_else(|| "User not authenticated".to_string())
    }

    pub fn load_session() -> Option<String> {
        let session_file = config_dir().ok()?.join(SESSION_FILE);
        let user_id = std::fs::read_to_string(session_file).ok()?;
        let user_id = user_id.trim();
        if user_id.is_empty() {
            None
        } else {
            Some(user_id.to_string())
        }
    }

    pub fn save_session(user_id: Option<&str>) -> Result<(), String> {
        let dir = config_dir()?;
        std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
        let session_file = dir.join(SESSION_FILE);

        match user_id {
            Some(user_id) => std::fs::write(session_file, user_id).map_err(|e| e.to_string()),
            None => {
                if session_file.exists() {
                    std::fs::remove_file(session_file).map_err(|e| e.to_string())?;
                }
                Ok(())
            }
        }
    }
}
