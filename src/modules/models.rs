use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The five mood categories, in display order.
pub const MOODS: [Mood; 5] = [
    Mood::Happy,
    Mood::Content,
    Mood::Okay,
    Mood::Sad,
    Mood::Anxious,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Content,
    Okay,
    Sad,
    Anxious,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Content => "content",
            Mood::Okay => "okay",
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
        }
    }

    /// Rows carrying a tag outside the fixed set are rejected at the
    /// facade boundary rather than passed through.
    pub fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "happy" => Ok(Mood::Happy),
            "content" => Ok(Mood::Content),
            "okay" => Ok(Mood::Okay),
            "sad" => Ok(Mood::Sad),
            "anxious" => Ok(Mood::Anxious),
            other => Err(format!("Unknown mood tag: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub voice_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub voice_note: Option<String>,
}

/// Absent fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalEntryUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub voice_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodLog {
    pub id: i64,
    pub user_id: String,
    pub log_date: NaiveDate,
    pub mood: Mood,
    pub note: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMoodLog {
    pub log_date: NaiveDate,
    pub mood: Mood,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Image,
    Quote,
    Color,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Image => "image",
            ItemKind::Quote => "quote",
            ItemKind::Color => "color",
        }
    }

    pub fn from_str(value: &str) -> Result<Self, String> {
        match value {
            "image" => Ok(ItemKind::Image),
            "quote" => Ok(ItemKind::Quote),
            "color" => Ok(ItemKind::Color),
            other => Err(format!("Unknown board item kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionBoard {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_favorite: bool,
    pub items: Vec<VisionBoardItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVisionBoard {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionBoardUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionBoardItem {
    pub id: i64,
    pub board_id: i64,
    pub kind: ItemKind,
    pub content: String,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVisionBoardItem {
    pub board_id: i64,
    pub kind: ItemKind,
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionBoardItemUpdate {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_serialize() {
        assert_eq!(r#""happy""#, serde_json::to_string(&Mood::Happy).unwrap());
        assert_eq!(r#""anxious""#, serde_json::to_string(&Mood::Anxious).unwrap());
        let parsed: Mood = serde_json::from_str(r#""sad""#).unwrap();
        assert_eq!(Mood::Sad, parsed);
    }

    #[test]
    fn test_mood_tag_round_trip() {
        for mood in MOODS {
            assert_eq!(mood, Mood::from_str(mood.as_str()).unwrap());
        }
        assert!(Mood::from_str("ecstatic").is_err());
    }

    #[test]
    fn test_item_kind_round_trip() {
        for kind in [ItemKind::Image, ItemKind::Quote, ItemKind::Color] {
            assert_eq!(kind, ItemKind::from_str(kind.as_str()).unwrap());
        }
        assert!(ItemKind::from_str("video").is_err());
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry: NewJournalEntry =
            serde_json::from_str(r#"{"title":"Morning","content":"Slept well."}"#).unwrap();
        assert!(entry.mood.is_none());
        assert!(entry.tags.is_empty());
        assert!(entry.images.is_empty());
    }
}
