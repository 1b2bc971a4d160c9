use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_plugin_notification::NotificationExt;

use crate::modules::models::Mood;
use crate::modules::utils::config_dir;

const SETTINGS_FILE: &str = "notifications.json";

const QUOTES: [&str; 5] = [
    "You are exactly where you need to be. 💫",
    "Your journey is beautiful and unique. 🌸",
    "Gratitude transforms ordinary days into magic. ✨",
    "You have the power to create your reality. 🌟",
    "Every breath is a gift, every moment a blessing. 🙏",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_daily_reminder")]
    pub daily_reminder: bool,
    #[serde(default = "default_reminder_time")]
    pub reminder_time: String,
    #[serde(default = "default_weekly_insights")]
    pub weekly_insights: bool,
    #[serde(default)]
    pub motivational_quotes: bool,
    #[serde(default = "default_quote_interval")]
    pub quote_interval_minutes: u32,
}

fn default_daily_reminder() -> bool {
    true
}

fn default_reminder_time() -> String {
    "20:00".to_string()
}

fn default_weekly_insights() -> bool {
    true
}

fn default_quote_interval() -> u32 {
    120
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            daily_reminder: default_daily_reminder(),
            reminder_time: default_reminder_time(),
            weekly_insights: default_weekly_insights(),
            motivational_quotes: false,
            quote_interval_minutes: default_quote_interval(),
        }
    }
}

pub fn load_settings() -> Result<NotificationSettings, String> {
    let settings_path = config_dir()?.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(NotificationSettings::default());
    }

    let settings_str = std::fs::read_to_string(&settings_path)
        .map_err(|e| format!("Failed to read notification settings: {}", e))?;
    serde_json::from_str(&settings_str)
        .map_err(|e| format!("Failed to parse notification settings: {}", e))
}

pub fn save_settings(settings: &NotificationSettings) -> Result<(), String> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| e.to_string())?;

    let settings_str = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize notification settings: {}", e))?;
    std::fs::write(dir.join(SETTINGS_FILE), settings_str)
        .map_err(|e| format!("Failed to write notification settings: {}", e))
}

pub fn parse_reminder_time(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|e| format!("Invalid reminder time {}: {}", value, e))
}

/// Decides, on a one-minute tick, whether the daily reminder fires now.
/// Fires in the configured minute, at most once per calendar day.
pub fn reminder_due(
    settings: &NotificationSettings,
    now: NaiveTime,
    today: NaiveDate,
    last_fired: Option<NaiveDate>,
) -> bool {
    if !settings.daily_reminder {
        return false;
    }
    if last_fired == Some(today) {
        return false;
    }
    match parse_reminder_time(&settings.reminder_time) {
        Ok(at) => now.hour() == at.hour() && now.minute() == at.minute(),
        Err(e) => {
            log::warn!("{}", e);
            false
        }
    }
}

/// A quote fires once the configured interval has elapsed since the last.
pub fn quote_due(
    settings: &NotificationSettings,
    now: DateTime<Utc>,
    last_fired: Option<DateTime<Utc>>,
) -> bool {
    if !settings.motivational_quotes {
        return false;
    }
    match last_fired {
        Some(last) => {
            now.signed_duration_since(last).num_minutes() >= settings.quote_interval_minutes as i64
        }
        None => false,
    }
}

/// Quotes rotate in order rather than at random, so the cadence is stable.
pub fn next_quote(counter: usize) -> &'static str {
    QUOTES[counter % QUOTES.len()]
}

pub fn show_notification(app: &AppHandle, title: &str, body: &str) {
    if let Err(e) = app.notification().builder().title(title).body(body).show() {
        log::warn!("Failed to show notification: {}", e);
    }
}

pub fn send_daily_reminder(app: &AppHandle) {
    show_notification(
        app,
        "Time for gratitude 🌟",
        "Take a moment to reflect on what you're grateful for today.",
    );
}

pub fn send_quote(app: &AppHandle, counter: usize) {
    show_notification(app, "A gentle reminder", next_quote(counter));
}

pub fn send_weekly_insight(app: &AppHandle, entry_count: usize, top_mood: Option<Mood>) {
    let mood_text = top_mood.map(|mood| mood.as_str()).unwrap_or("balanced");
    show_notification(
        app,
        "Your weekly insight 📊",
        &format!(
            "This week: {} entries, feeling mostly {}. Keep nurturing your soul! 🌱",
            entry_count, mood_text
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn test_parse_reminder_time() {
        assert_eq!(time(20, 0), parse_reminder_time("20:00").unwrap());
        assert!(parse_reminder_time("late").is_err());
        assert!(parse_reminder_time("25:00").is_err());
    }

    #[test]
    fn test_reminder_fires_in_the_configured_minute() {
        let settings = NotificationSettings::default();
        assert!(reminder_due(&settings, time(20, 0), date(1), None));
        assert!(!reminder_due(&settings, time(19, 59), date(1), None));
        assert!(!reminder_due(&settings, time(20, 1), date(1), None));
    }

    #[test]
    fn test_reminder_fires_once_per_day() {
        let settings = NotificationSettings::default();
        assert!(!reminder_due(&settings, time(20, 0), date(1), Some(date(1))));
        assert!(reminder_due(&settings, time(20, 0), date(2), Some(date(1))));
    }

    #[test]
    fn test_reminder_respects_toggle() {
        let settings = NotificationSettings {
            daily_reminder: false,
            ..Default::default()
        };
        assert!(!reminder_due(&settings, time(20, 0), date(1), None));
    }

    #[test]
    fn test_quote_due_after_interval() {
        let settings = NotificationSettings {
            motivational_quotes: true,
            quote_interval_minutes: 120,
            ..Default::default()
        };
        let now: DateTime<Utc> = "2025-06-01T12:00:00Z".parse().unwrap();
        assert!(!quote_due(&settings, now, None));
        assert!(!quote_due(
            &settings,
            now,
            Some(now - chrono::Duration::minutes(119))
        ));
        assert!(quote_due(
            &settings,
            now,
            Some(now - chrono::Duration::minutes(120))
        ));
    }

    #[test]
    fn test_quote_rotation_wraps() {
        assert_eq!(next_quote(0), next_quote(QUOTES.len()));
        let distinct: std::collections::HashSet<&str> =
            (0..QUOTES.len()).map(next_quote).collect();
        assert_eq!(QUOTES.len(), distinct.len());
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: NotificationSettings =
            serde_json::from_str(r#"{"motivational_quotes":true}"#).unwrap();
        assert!(settings.daily_reminder);
        assert_eq!("20:00", settings.reminder_time);
        assert!(settings.motivational_quotes);
        assert_eq!(120, settings.quote_interval_minutes);
    }
}
