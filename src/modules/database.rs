use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{migrate::MigrateDatabase, Pool, Row, Sqlite, SqlitePool};

use crate::modules::models::{
    ItemKind, JournalEntry, JournalEntryUpdate, Mood, MoodLog, NewJournalEntry, NewMoodLog,
    NewVisionBoard, NewVisionBoardItem, UserProfile, UserProfileUpdate, VisionBoard,
    VisionBoardItem, VisionBoardItemUpdate, VisionBoardUpdate,
};

pub struct JournalDatabase {
    pub pool: Pool<Sqlite>,
}

impl JournalDatabase {
    pub async fn new(db_path: &str) -> Result<Self, String> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(db_path).await.unwrap_or(false) {
            Sqlite::create_database(db_path)
                .await
                .map_err(|e| format!("Failed to create database: {}", e))?;
        }

        let pool = SqlitePool::connect(db_path)
            .await
            .map_err(|e| format!("Failed to connect to database: {}", e))?;

        let db = Self { pool };
        db.initialize_schema().await?;
        Ok(db)
    }

    async fn initialize_schema(&self) -> Result<(), String> {
        let schema = r#"
        -- User profiles, keyed by the session identity
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT,
            full_name TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            mood TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            images TEXT NOT NULL DEFAULT '[]',
            voice_note TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );

        -- One log per user per calendar day
        CREATE TABLE IF NOT EXISTS mood_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            log_date DATE NOT NULL,
            mood TEXT NOT NULL,
            note TEXT,
            updated_at TIMESTAMP NOT NULL,
            UNIQUE(user_id, log_date)
        );

        CREATE TABLE IF NOT EXISTS vision_boards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            is_favorite BOOLEAN NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );

        CREATE TABLE IF NOT EXISTS vision_board_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL,
            kind TEXT NOT NULL,
            content TEXT NOT NULL,
            title TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        );

        -- Indices for the list queries
        CREATE INDEX IF NOT EXISTS idx_entries_user_created ON journal_entries(user_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_mood_logs_user_date ON mood_logs(user_id, log_date);
        CREATE INDEX IF NOT EXISTS idx_boards_user ON vision_boards(user_id);
        CREATE INDEX IF NOT EXISTS idx_items_board ON vision_board_items(board_id);
        "#;

        sqlx::raw_sql(schema)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to create schema: {}", e))?;

        Ok(())
    }

    // Journal entries

    pub async fn create_entry(
        &self,
        user_id: &str,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry, String> {
        let tags_json = serde_json::to_string(&entry.tags)
            .map_err(|e| format!("Failed to serialize tags: {}", e))?;
        let images_json = serde_json::to_string(&entry.images)
            .map_err(|e| format!("Failed to serialize images: {}", e))?;
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO journal_entries
            (user_id, title, content, mood, tags, images, voice_note, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
        )
        .bind(user_id)
        .bind(&entry.title)
        .bind(&entry.content)
        .bind(entry.mood.map(|mood| mood.as_str()))
        .bind(tags_json)
        .bind(images_json)
        .bind(&entry.voice_note)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to insert journal entry: {}", e))?;

        self.get_entry(user_id, result.last_insert_rowid()).await
    }

    pub async fn list_entries(&self, user_id: &str) -> Result<Vec<JournalEntry>, String> {
        let rows = sqlx::query(
            "SELECT * FROM journal_entries WHERE user_id = ?1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to fetch journal entries: {}", e))?;

        rows.iter().map(entry_from_row).collect()
    }

    pub async fn get_entry(&self, user_id: &str, id: i64) -> Result<JournalEntry, String> {
        let row = sqlx::query("SELECT * FROM journal_entries WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch journal entry: {}", e))?;

        match row {
            Some(row) => entry_from_row(&row),
            None => Err("Journal entry not found".to_string()),
        }
    }

    pub async fn update_entry(
        &self,
        user_id: &str,
        id: i64,
        updates: &JournalEntryUpdate,
    ) -> Result<JournalEntry, String> {
        let tags_json = updates
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| format!("Failed to serialize tags: {}", e))?;
        let images_json = updates
            .images
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| format!("Failed to serialize images: {}", e))?;

        sqlx::query(
            r#"
            UPDATE journal_entries SET
                title = COALESCE(?1, title),
                content = COALESCE(?2, content),
                mood = COALESCE(?3, mood),
                tags = COALESCE(?4, tags),
                images = COALESCE(?5, images),
                voice_note = COALESCE(?6, voice_note),
                updated_at = ?7
            WHERE id = ?8 AND user_id = ?9
            "#,
        )
        .bind(&updates.title)
        .bind(&updates.content)
        .bind(updates.mood.map(|mood| mood.as_str()))
        .bind(tags_json)
        .bind(images_json)
        .bind(&updates.voice_note)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update journal entry: {}", e))?;

        self.get_entry(user_id, id).await
    }

    pub async fn delete_entry(&self, user_id: &str, id: i64) -> Result<(), String> {
        sqlx::query("DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete journal entry: {}", e))?;

        Ok(())
    }

    pub async fn search_entries(
        &self,
        user_id: &str,
        query: &str,
    ) -> Result<Vec<JournalEntry>, String> {
        let pattern = format!("%{}%", query);
        let rows = sqlx::query(
            r#"
            SELECT * FROM journal_entries
            WHERE user_id = ?1 AND (title LIKE ?2 OR content LIKE ?2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to search journal entries: {}", e))?;

        rows.iter().map(entry_from_row).collect()
    }

    pub async fn count_entries(&self, user_id: &str) -> Result<i64, String> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM journal_entries WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to count journal entries: {}", e))?;

        Ok(row.get("count"))
    }

    /// Creation timestamps of the most recent entries, newest first.
    pub async fn recent_entry_times(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<DateTime<Utc>>, String> {
        let rows = sqlx::query(
            "SELECT created_at FROM journal_entries WHERE user_id = ?1 ORDER BY created_at DESC LIMIT ?2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to fetch entry timestamps: {}", e))?;

        rows.iter()
            .map(|row| {
                row.try_get("created_at")
                    .map_err(|e| format!("Failed to get created_at: {}", e))
            })
            .collect()
    }

    // Mood logs

    /// One log per (user, date): logging again for the same date replaces
    /// the stored mood and note.
    pub async fn upsert_mood_log(
        &self,
        user_id: &str,
        log: &NewMoodLog,
    ) -> Result<MoodLog, String> {
        sqlx::query(
            r#"
            INSERT INTO mood_logs (user_id, log_date, mood, note, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, log_date) DO UPDATE SET
                mood = excluded.mood,
                note = excluded.note,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(log.log_date)
        .bind(log.mood.as_str())
        .bind(&log.note)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to store mood log: {}", e))?;

        let row = sqlx::query("SELECT * FROM mood_logs WHERE user_id = ?1 AND log_date = ?2")
            .bind(user_id)
            .bind(log.log_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch mood log: {}", e))?;

        mood_log_from_row(&row)
    }

    /// Unbounded lists come back newest first; date-ranged queries come
    /// back in ascending date order.
    pub async fn list_mood_logs(
        &self,
        user_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<MoodLog>, String> {
        let order = if start_date.is_some() || end_date.is_some() {
            "ASC"
        } else {
            "DESC"
        };
        let sql = format!(
            r#"
            SELECT * FROM mood_logs
            WHERE user_id = ?1
              AND (?2 IS NULL OR log_date >= ?2)
              AND (?3 IS NULL OR log_date <= ?3)
            ORDER BY log_date {}
            "#,
            order
        );

        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(start_date)
            .bind(end_date)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch mood logs: {}", e))?;

        rows.iter().map(mood_log_from_row).collect()
    }

    pub async fn delete_mood_log(&self, user_id: &str, id: i64) -> Result<(), String> {
        sqlx::query("DELETE FROM mood_logs WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| format!("Failed to delete mood log: {}", e))?;

        Ok(())
    }

    pub async fn latest_mood_log(&self, user_id: &str) -> Result<Option<MoodLog>, String> {
        let row = sqlx::query(
            "SELECT * FROM mood_logs WHERE user_id = ?1 ORDER BY log_date DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| format!("Failed to fetch latest mood log: {}", e))?;

        row.as_ref().map(mood_log_from_row).transpose()
    }

    pub async fn count_mood_logs(&self, user_id: &str) -> Result<i64, String> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM mood_logs WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to count mood logs: {}", e))?;

        Ok(row.get("count"))
    }

    // Vision boards

    pub async fn create_board(
        &self,
        user_id: &str,
        board: &NewVisionBoard,
    ) -> Result<VisionBoard, String> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO vision_boards (user_id, title, description, is_favorite, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?4)
            "#,
        )
        .bind(user_id)
        .bind(&board.title)
        .bind(&board.description)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to insert vision board: {}", e))?;

        self.get_board(user_id, result.last_insert_rowid()).await
    }

    pub async fn list_boards(&self, user_id: &str) -> Result<Vec<VisionBoard>, String> {
        let rows =
            sqlx::query("SELECT * FROM vision_boards WHERE user_id = ?1 ORDER BY created_at DESC")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| format!("Failed to fetch vision boards: {}", e))?;

        let mut boards = rows
            .iter()
            .map(board_from_row)
            .collect::<Result<Vec<VisionBoard>, String>>()?;

        let item_rows = sqlx::query(
            r#"
            SELECT i.* FROM vision_board_items i
            JOIN vision_boards b ON b.id = i.board_id
            WHERE b.user_id = ?1
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to fetch board items: {}", e))?;

        for row in &item_rows {
            let item = item_from_row(row)?;
            if let Some(board) = boards.iter_mut().find(|board| board.id == item.board_id) {
                board.items.push(item);
            }
        }

        Ok(boards)
    }

    pub async fn get_board(&self, user_id: &str, id: i64) -> Result<VisionBoard, String> {
        let row = sqlx::query("SELECT * FROM vision_boards WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch vision board: {}", e))?;

        let mut board = match row {
            Some(row) => board_from_row(&row)?,
            None => return Err("Vision board not found".to_string()),
        };
        board.items = self.list_board_items(user_id, id).await?;
        Ok(board)
    }

    pub async fn update_board(
        &self,
        user_id: &str,
        id: i64,
        updates: &VisionBoardUpdate,
    ) -> Result<VisionBoard, String> {
        sqlx::query(
            r#"
            UPDATE vision_boards SET
                title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                updated_at = ?3
            WHERE id = ?4 AND user_id = ?5
            "#,
        )
        .bind(&updates.title)
        .bind(&updates.description)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update vision board: {}", e))?;

        self.get_board(user_id, id).await
    }

    pub async fn delete_board(&self, user_id: &str, id: i64) -> Result<(), String> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to start transaction: {}", e))?;

        sqlx::query(
            r#"
            DELETE FROM vision_board_items
            WHERE board_id IN (SELECT id FROM vision_boards WHERE id = ?1 AND user_id = ?2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| format!("Failed to delete board items: {}", e))?;

        sqlx::query("DELETE FROM vision_boards WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to delete vision board: {}", e))?;

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit transaction: {}", e))?;

        Ok(())
    }

    /// At most one favorite per user: clearing the others and setting the
    /// target happens in one transaction.
    pub async fn set_favorite_board(
        &self,
        user_id: &str,
        id: i64,
        favorite: bool,
    ) -> Result<VisionBoard, String> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| format!("Failed to start transaction: {}", e))?;

        if favorite {
            sqlx::query(
                "UPDATE vision_boards SET is_favorite = 0 WHERE user_id = ?1 AND id != ?2 AND is_favorite = 1",
            )
            .bind(user_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| format!("Failed to clear favorite boards: {}", e))?;
        }

        let result = sqlx::query(
            "UPDATE vision_boards SET is_favorite = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
        )
        .bind(favorite)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| format!("Failed to update favorite board: {}", e))?;

        if result.rows_affected() == 0 {
            return Err("Vision board not found".to_string());
        }

        tx.commit()
            .await
            .map_err(|e| format!("Failed to commit transaction: {}", e))?;

        self.get_board(user_id, id).await
    }

    pub async fn count_boards(&self, user_id: &str) -> Result<i64, String> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM vision_boards WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to count vision boards: {}", e))?;

        Ok(row.get("count"))
    }

    // Vision board items

    pub async fn add_item(
        &self,
        user_id: &str,
        item: &NewVisionBoardItem,
    ) -> Result<VisionBoardItem, String> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO vision_board_items (board_id, kind, content, title, created_at, updated_at)
            SELECT ?1, ?2, ?3, ?4, ?5, ?5
            WHERE EXISTS (SELECT 1 FROM vision_boards WHERE id = ?1 AND user_id = ?6)
            "#,
        )
        .bind(item.board_id)
        .bind(item.kind.as_str())
        .bind(&item.content)
        .bind(&item.title)
        .bind(now)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to insert board item: {}", e))?;

        if result.rows_affected() == 0 {
            return Err("Vision board not found".to_string());
        }

        let row = sqlx::query("SELECT * FROM vision_board_items WHERE id = ?1")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch board item: {}", e))?;

        item_from_row(&row)
    }

    pub async fn list_board_items(
        &self,
        user_id: &str,
        board_id: i64,
    ) -> Result<Vec<VisionBoardItem>, String> {
        let rows = sqlx::query(
            r#"
            SELECT i.* FROM vision_board_items i
            JOIN vision_boards b ON b.id = i.board_id
            WHERE i.board_id = ?1 AND b.user_id = ?2
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(board_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| format!("Failed to fetch board items: {}", e))?;

        rows.iter().map(item_from_row).collect()
    }

    pub async fn update_item(
        &self,
        user_id: &str,
        id: i64,
        updates: &VisionBoardItemUpdate,
    ) -> Result<VisionBoardItem, String> {
        let result = sqlx::query(
            r#"
            UPDATE vision_board_items SET
                content = COALESCE(?1, content),
                title = COALESCE(?2, title),
                updated_at = ?3
            WHERE id = ?4
              AND board_id IN (SELECT id FROM vision_boards WHERE user_id = ?5)
            "#,
        )
        .bind(&updates.content)
        .bind(&updates.title)
        .bind(Utc::now())
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update board item: {}", e))?;

        if result.rows_affected() == 0 {
            return Err("Board item not found".to_string());
        }

        let row = sqlx::query("SELECT * FROM vision_board_items WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch board item: {}", e))?;

        item_from_row(&row)
    }

    pub async fn delete_item(&self, user_id: &str, id: i64) -> Result<(), String> {
        sqlx::query(
            r#"
            DELETE FROM vision_board_items
            WHERE id = ?1
              AND board_id IN (SELECT id FROM vision_boards WHERE user_id = ?2)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to delete board item: {}", e))?;

        Ok(())
    }

    // Users

    pub async fn upsert_user(
        &self,
        id: &str,
        username: Option<&str>,
        full_name: Option<&str>,
    ) -> Result<UserProfile, String> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, full_name, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                username = COALESCE(excluded.username, users.username),
                full_name = COALESCE(excluded.full_name, users.full_name),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(full_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to store user: {}", e))?;

        self.get_user_profile(id).await
    }

    pub async fn get_user_profile(&self, id: &str) -> Result<UserProfile, String> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| format!("Failed to fetch user profile: {}", e))?;

        match row {
            Some(row) => profile_from_row(&row),
            None => Err("User profile not found".to_string()),
        }
    }

    pub async fn update_user_profile(
        &self,
        id: &str,
        updates: &UserProfileUpdate,
    ) -> Result<UserProfile, String> {
        sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?1, username),
                full_name = COALESCE(?2, full_name),
                updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(&updates.username)
        .bind(&updates.full_name)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to update user profile: {}", e))?;

        self.get_user_profile(id).await
    }
}

fn entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<JournalEntry, String> {
    let mood: Option<String> = row
        .try_get("mood")
        .map_err(|e| format!("Failed to get mood: {}", e))?;
    let tags_json: String = row
        .try_get("tags")
        .map_err(|e| format!("Failed to get tags: {}", e))?;
    let images_json: String = row
        .try_get("images")
        .map_err(|e| format!("Failed to get images: {}", e))?;

    Ok(JournalEntry {
        id: row
            .try_get("id")
            .map_err(|e| format!("Failed to get id: {}", e))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| format!("Failed to get user_id: {}", e))?,
        title: row
            .try_get("title")
            .map_err(|e| format!("Failed to get title: {}", e))?,
        content: row
            .try_get("content")
            .map_err(|e| format!("Failed to get content: {}", e))?,
        mood: mood.as_deref().map(Mood::from_str).transpose()?,
        tags: serde_json::from_str(&tags_json)
            .map_err(|e| format!("Failed to deserialize tags: {}", e))?,
        images: serde_json::from_str(&images_json)
            .map_err(|e| format!("Failed to deserialize images: {}", e))?,
        voice_note: row
            .try_get("voice_note")
            .map_err(|e| format!("Failed to get voice_note: {}", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| format!("Failed to get created_at: {}", e))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| format!("Failed to get updated_at: {}", e))?,
    })
}

fn mood_log_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<MoodLog, String> {
    let mood: String = row
        .try_get("mood")
        .map_err(|e| format!("Failed to get mood: {}", e))?;

    Ok(MoodLog {
        id: row
            .try_get("id")
            .map_err(|e| format!("Failed to get id: {}", e))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| format!("Failed to get user_id: {}", e))?,
        log_date: row
            .try_get("log_date")
            .map_err(|e| format!("Failed to get log_date: {}", e))?,
        mood: Mood::from_str(&mood)?,
        note: row
            .try_get("note")
            .map_err(|e| format!("Failed to get note: {}", e))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| format!("Failed to get updated_at: {}", e))?,
    })
}

fn board_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<VisionBoard, String> {
    Ok(VisionBoard {
        id: row
            .try_get("id")
            .map_err(|e| format!("Failed to get id: {}", e))?,
        user_id: row
            .try_get("user_id")
            .map_err(|e| format!("Failed to get user_id: {}", e))?,
        title: row
            .try_get("title")
            .map_err(|e| format!("Failed to get title: {}", e))?,
        description: row
            .try_get("description")
            .map_err(|e| format!("Failed to get description: {}", e))?,
        is_favorite: row
            .try_get("is_favorite")
            .map_err(|e| format!("Failed to get is_favorite: {}", e))?,
        items: Vec::new(),
        created_at: row
            .try_get("created_at")
            .map_err(|e| format!("Failed to get created_at: {}", e))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| format!("Failed to get updated_at: {}", e))?,
    })
}

fn item_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<VisionBoardItem, String> {
    let kind: String = row
        .try_get("kind")
        .map_err(|e| format!("Failed to get kind: {}", e))?;

    Ok(VisionBoardItem {
        id: row
            .try_get("id")
            .map_err(|e| format!("Failed to get id: {}", e))?,
        board_id: row
            .try_get("board_id")
            .map_err(|e| format!("Failed to get board_id: {}", e))?,
        kind: ItemKind::from_str(&kind)?,
        content: row
            .try_get("content")
            .map_err(|e| format!("Failed to get content: {}", e))?,
        title: row
            .try_get("title")
            .map_err(|e| format!("Failed to get title: {}", e))?,
        created_at: row
            .try_get("created_at")
            .map_err(|e| format!("Failed to get created_at: {}", e))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| format!("Failed to get updated_at: {}", e))?,
    })
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserProfile, String> {
    Ok(UserProfile {
        id: row
            .try_get("id")
            .map_err(|e| format!("Failed to get id: {}", e))?,
        username: row
            .try_get("username")
            .map_err(|e| format!("Failed to get username: {}", e))?,
        full_name: row
            .try_get("full_name")
            .map_err(|e| format!("Failed to get full_name: {}", e))?,
        updated_at: row
            .try_get("updated_at")
            .map_err(|e| format!("Failed to get updated_at: {}", e))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> JournalDatabase {
        // A single connection, or every pooled connection would see its own
        // empty in-memory database.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        let db = JournalDatabase { pool };
        db.initialize_schema()
            .await
            .expect("Failed to create schema");
        db
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_mood_upsert_replaces_same_date() {
        let db = test_db().await;

        let first = NewMoodLog {
            log_date: date(1),
            mood: Mood::Okay,
            note: None,
        };
        let second = NewMoodLog {
            log_date: date(1),
            mood: Mood::Happy,
            note: Some("Better by evening".to_string()),
        };

        db.upsert_mood_log("user-1", &first).await.unwrap();
        let stored = db.upsert_mood_log("user-1", &second).await.unwrap();

        assert_eq!(Mood::Happy, stored.mood);
        assert_eq!(Some("Better by evening".to_string()), stored.note);
        assert_eq!(1, db.count_mood_logs("user-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_mood_log_order_depends_on_range() {
        let db = test_db().await;
        for (day, mood) in [(1, Mood::Sad), (3, Mood::Okay), (2, Mood::Happy)] {
            db.upsert_mood_log(
                "user-1",
                &NewMoodLog {
                    log_date: date(day),
                    mood,
                    note: None,
                },
            )
            .await
            .unwrap();
        }

        let unbounded = db.list_mood_logs("user-1", None, None).await.unwrap();
        let dates: Vec<NaiveDate> = unbounded.iter().map(|log| log.log_date).collect();
        assert_eq!(vec![date(3), date(2), date(1)], dates);

        let ranged = db
            .list_mood_logs("user-1", Some(date(1)), Some(date(2)))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = ranged.iter().map(|log| log.log_date).collect();
        assert_eq!(vec![date(1), date(2)], dates);
    }

    #[tokio::test]
    async fn test_favorite_board_is_exclusive() {
        let db = test_db().await;
        let first = db
            .create_board(
                "user-1",
                &NewVisionBoard {
                    title: "Calm mornings".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        let second = db
            .create_board(
                "user-1",
                &NewVisionBoard {
                    title: "Travel".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        db.set_favorite_board("user-1", first.id, true)
            .await
            .unwrap();
        db.set_favorite_board("user-1", second.id, true)
            .await
            .unwrap();

        let boards = db.list_boards("user-1").await.unwrap();
        let favorites: Vec<i64> = boards
            .iter()
            .filter(|board| board.is_favorite)
            .map(|board| board.id)
            .collect();
        assert_eq!(vec![second.id], favorites);
    }

    #[tokio::test]
    async fn test_entries_are_owner_scoped() {
        let db = test_db().await;
        let entry = NewJournalEntry {
            title: "Quiet evening".to_string(),
            content: "Walked by the river.".to_string(),
            mood: Some(Mood::Content),
            tags: vec!["gratitude".to_string()],
            images: Vec::new(),
            voice_note: None,
        };
        let created = db.create_entry("user-1", &entry).await.unwrap();

        assert_eq!("user-1", created.user_id);
        assert_eq!(Some(Mood::Content), created.mood);
        assert_eq!(vec!["gratitude".to_string()], created.tags);
        assert_eq!(1, db.list_entries("user-1").await.unwrap().len());
        assert!(db.list_entries("user-2").await.unwrap().is_empty());
        assert!(db.get_entry("user-2", created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_update_entry_keeps_absent_fields() {
        let db = test_db().await;
        let created = db
            .create_entry(
                "user-1",
                &NewJournalEntry {
                    title: "Draft".to_string(),
                    content: "First thoughts".to_string(),
                    mood: Some(Mood::Okay),
                    tags: Vec::new(),
                    images: Vec::new(),
                    voice_note: None,
                },
            )
            .await
            .unwrap();

        let updated = db
            .update_entry(
                "user-1",
                created.id,
                &JournalEntryUpdate {
                    content: Some("First thoughts, expanded".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!("Draft", updated.title);
        assert_eq!("First thoughts, expanded", updated.content);
        assert_eq!(Some(Mood::Okay), updated.mood);
    }

    #[tokio::test]
    async fn test_search_matches_title_and_content() {
        let db = test_db().await;
        for (title, content) in [
            ("Morning pages", "Coffee and sunlight"),
            ("Evening recap", "The meeting went well"),
        ] {
            db.create_entry(
                "user-1",
                &NewJournalEntry {
                    title: title.to_string(),
                    content: content.to_string(),
                    mood: None,
                    tags: Vec::new(),
                    images: Vec::new(),
                    voice_note: None,
                },
            )
            .await
            .unwrap();
        }

        assert_eq!(
            1,
            db.search_entries("user-1", "meeting").await.unwrap().len()
        );
        assert_eq!(
            1,
            db.search_entries("user-1", "morning").await.unwrap().len()
        );
        assert!(db
            .search_entries("user-1", "holiday")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_item_requires_owned_board() {
        let db = test_db().await;
        let board = db
            .create_board(
                "user-1",
                &NewVisionBoard {
                    title: "Home".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();

        let item = NewVisionBoardItem {
            board_id: board.id,
            kind: ItemKind::Quote,
            content: "Less, but better".to_string(),
            title: None,
        };
        assert!(db.add_item("user-2", &item).await.is_err());
        let added = db.add_item("user-1", &item).await.unwrap();
        assert_eq!(board.id, added.board_id);

        let boards = db.list_boards("user-1").await.unwrap();
        assert_eq!(1, boards[0].items.len());
    }

    #[tokio::test]
    async fn test_delete_board_removes_items() {
        let db = test_db().await;
        let board = db
            .create_board(
                "user-1",
                &NewVisionBoard {
                    title: "Home".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        db.add_item(
            "user-1",
            &NewVisionBoardItem {
                board_id: board.id,
                kind: ItemKind::Color,
                content: "#7c9a92".to_string(),
                title: None,
            },
        )
        .await
        .unwrap();

        db.delete_board("user-1", board.id).await.unwrap();

        assert!(db.list_boards("user-1").await.unwrap().is_empty());
        assert!(db
            .list_board_items("user-1", board.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_user_upsert_keeps_existing_fields() {
        let db = test_db().await;
        db.upsert_user("user-1", Some("ren"), Some("Ren Ito"))
            .await
            .unwrap();
        let profile = db.upsert_user("user-1", None, None).await.unwrap();

        assert_eq!(Some("ren".to_string()), profile.username);
        assert_eq!(Some("Ren Ito".to_string()), profile.full_name);
    }
}
