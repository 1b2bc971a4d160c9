use chrono::{Duration, NaiveDate, Utc};
use indexmap::IndexMap;
use tauri::{AppHandle, State};

use crate::modules::analytics::{self, DashboardStats, MoodShare, WeeklyInsight};
use crate::modules::app_state::AppState;
use crate::modules::audio_recorder::AudioRecording;
use crate::modules::board_editor::{DragState, DraggableItem, DraggableItemUpdate, Point};
use crate::modules::models::{
    JournalEntry, JournalEntryUpdate, Mood, MoodLog, NewJournalEntry, NewMoodLog, NewVisionBoard,
    NewVisionBoardItem, UserProfile, UserProfileUpdate, VisionBoard, VisionBoardItem,
    VisionBoardItemUpdate, VisionBoardUpdate,
};
use crate::modules::notifications::{self, NotificationSettings};
use crate::modules::speech::{self, TtsOptions};
use crate::modules::storage;
use crate::modules::utils::{local_day, send_log, today};

// Session

#[tauri::command]
pub async fn sign_in(
    user_id: String,
    username: Option<String>,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<UserProfile, String> {
    if user_id.trim().is_empty() {
        return Err("A user id is required".to_string());
    }

    let profile = state
        .db
        .upsert_user(user_id.trim(), username.as_deref(), None)
        .await?;

    {
        let mut current = state.current_user.lock().await;
        *current = Some(profile.id.clone());
    }
    AppState::save_session(Some(&profile.id))?;

    send_log(&app, "info", &format!("Signed in as {}", profile.id));
    Ok(profile)
}

#[tauri::command]
pub async fn sign_out(state: State<'_, AppState>, app: AppHandle) -> Result<(), String> {
    {
        let mut current = state.current_user.lock().await;
        *current = None;
    }
    AppState::save_session(None)?;
    send_log(&app, "info", "Signed out");
    Ok(())
}

#[tauri::command]
pub async fn current_user(state: State<'_, AppState>) -> Result<Option<String>, String> {
    Ok(state.current_user.lock().await.clone())
}

// User profile

#[tauri::command]
pub async fn get_user_profile(state: State<'_, AppState>) -> Result<UserProfile, String> {
    let user_id = state.require_user().await?;
    state.db.get_user_profile(&user_id).await
}

#[tauri::command]
pub async fn update_user_profile(
    updates: UserProfileUpdate,
    state: State<'_, AppState>,
) -> Result<UserProfile, String> {
    let user_id = state.require_user().await?;
    state.db.update_user_profile(&user_id, &updates).await
}

// Journal entries

#[tauri::command]
pub async fn create_journal_entry(
    entry: NewJournalEntry,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<JournalEntry, String> {
    let user_id = state.require_user().await?;
    if entry.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    let created = state.db.create_entry(&user_id, &entry).await?;
    send_log(&app, "info", &format!("Journal entry {} created", created.id));
    Ok(created)
}

#[tauri::command]
pub async fn get_journal_entries(
    state: State<'_, AppState>,
) -> Result<Vec<JournalEntry>, String> {
    let user_id = state.require_user().await?;
    state.db.list_entries(&user_id).await
}

#[tauri::command]
pub async fn get_journal_entry(
    id: i64,
    state: State<'_, AppState>,
) -> Result<JournalEntry, String> {
    let user_id = state.require_user().await?;
    state.db.get_entry(&user_id, id).await
}

#[tauri::command]
pub async fn update_journal_entry(
    id: i64,
    updates: JournalEntryUpdate,
    state: State<'_, AppState>,
) -> Result<JournalEntry, String> {
    let user_id = state.require_user().await?;
    state.db.update_entry(&user_id, id, &updates).await
}

#[tauri::command]
pub async fn delete_journal_entry(id: i64, state: State<'_, AppState>) -> Result<(), String> {
    let user_id = state.require_user().await?;
    state.db.delete_entry(&user_id, id).await
}

#[tauri::command]
pub async fn search_journal_entries(
    query: String,
    state: State<'_, AppState>,
) -> Result<Vec<JournalEntry>, String> {
    let user_id = state.require_user().await?;
    state.db.search_entries(&user_id, &query).await
}

// Mood logs

#[tauri::command]
pub async fn log_mood(log: NewMoodLog, state: State<'_, AppState>) -> Result<MoodLog, String> {
    let user_id = state.require_user().await?;
    state.db.upsert_mood_log(&user_id, &log).await
}

#[tauri::command]
pub async fn get_mood_logs(
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    state: State<'_, AppState>,
) -> Result<Vec<MoodLog>, String> {
    let user_id = state.require_user().await?;
    state.db.list_mood_logs(&user_id, start_date, end_date).await
}

/// Mood logs over a trailing window, oldest first. Defaults to 30 days.
#[tauri::command]
pub async fn get_mood_insights(
    days: Option<i64>,
    state: State<'_, AppState>,
) -> Result<Vec<MoodLog>, String> {
    let user_id = state.require_user().await?;
    let end = today();
    let start = end - Duration::days(days.unwrap_or(30));
    state
        .db
        .list_mood_logs(&user_id, Some(start), Some(end))
        .await
}

#[tauri::command]
pub async fn delete_mood_log(id: i64, state: State<'_, AppState>) -> Result<(), String> {
    let user_id = state.require_user().await?;
    state.db.delete_mood_log(&user_id, id).await
}

#[tauri::command]
pub async fn get_mood_distribution(
    state: State<'_, AppState>,
) -> Result<IndexMap<Mood, MoodShare>, String> {
    let user_id = state.require_user().await?;
    let logs = state.db.list_mood_logs(&user_id, None, None).await?;
    Ok(analytics::mood_distribution(&logs))
}

#[tauri::command]
pub async fn get_mood_streak(state: State<'_, AppState>) -> Result<u32, String> {
    let user_id = state.require_user().await?;
    let logs = state.db.list_mood_logs(&user_id, None, None).await?;
    let dates: Vec<NaiveDate> = logs.iter().map(|log| log.log_date).collect();
    Ok(analytics::mood_streak(&dates, today()))
}

// Dashboard

#[tauri::command]
pub async fn get_dashboard_stats(state: State<'_, AppState>) -> Result<DashboardStats, String> {
    let user_id = state.require_user().await?;

    let journal_count = state.db.count_entries(&user_id).await?;
    let mood_count = state.db.count_mood_logs(&user_id).await?;
    let vision_board_count = state.db.count_boards(&user_id).await?;
    let recent_mood = state
        .db
        .latest_mood_log(&user_id)
        .await?
        .map(|log| log.mood);
    let entry_dates: Vec<NaiveDate> = state
        .db
        .recent_entry_times(&user_id, 30)
        .await?
        .into_iter()
        .map(local_day)
        .collect();

    Ok(analytics::dashboard_stats(
        journal_count,
        mood_count,
        vision_board_count,
        recent_mood,
        &entry_dates,
        today(),
    ))
}

/// Mood logs of the trailing 7 days, oldest first.
#[tauri::command]
pub async fn get_weekly_mood_insights(
    state: State<'_, AppState>,
) -> Result<Vec<MoodLog>, String> {
    let user_id = state.require_user().await?;
    let end = today();
    let start = end - Duration::days(6);
    state
        .db
        .list_mood_logs(&user_id, Some(start), Some(end))
        .await
}

#[tauri::command]
pub async fn send_weekly_insight(
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<WeeklyInsight, String> {
    let user_id = state.require_user().await?;

    let logs = state.db.list_mood_logs(&user_id, None, None).await?;
    let entry_dates: Vec<NaiveDate> = state
        .db
        .recent_entry_times(&user_id, 100)
        .await?
        .into_iter()
        .map(local_day)
        .collect();
    let reference = today();
    let weekly_entries = analytics::weekly_window(&entry_dates, |date| *date, reference);

    let insight = analytics::weekly_insight(&logs, weekly_entries.len(), reference);

    let settings = state.notification_settings.lock().await.clone();
    if settings.weekly_insights {
        notifications::send_weekly_insight(&app, insight.entry_count, insight.top_mood);
    }

    Ok(insight)
}

// File embedding

#[tauri::command]
pub async fn upload_image(
    file_name: String,
    mime_type: String,
    bytes: Vec<u8>,
) -> Result<String, String> {
    storage::encode_image(&file_name, &mime_type, &bytes)
}

#[tauri::command]
pub async fn upload_voice_note(mime_type: String, bytes: Vec<u8>) -> Result<String, String> {
    storage::encode_voice_note(&mime_type, &bytes)
}

/// Embedded files have no external copy to remove.
#[tauri::command]
pub async fn delete_file(file_name: String) -> Result<(), String> {
    storage::delete_file(&file_name);
    Ok(())
}

// Voice notes

#[tauri::command]
pub async fn start_recording(
    mime_type: Option<String>,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<bool, String> {
    let mut recorder = state.recorder.lock().await;
    let started = recorder.start(mime_type);
    if started {
        send_log(&app, "info", "Recording started");
    }
    Ok(started)
}

#[tauri::command]
pub async fn push_recording_chunk(
    chunk: Vec<u8>,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let mut recorder = state.recorder.lock().await;
    recorder.push_chunk(chunk)
}

#[tauri::command]
pub async fn stop_recording(
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<AudioRecording, String> {
    let mut recorder = state.recorder.lock().await;
    let recording = recorder.stop()?;
    send_log(
        &app,
        "info",
        &format!("Voice note captured ({} ms)", recording.duration_ms),
    );
    Ok(recording)
}

#[tauri::command]
pub async fn get_recordings(state: State<'_, AppState>) -> Result<Vec<AudioRecording>, String> {
    let recorder = state.recorder.lock().await;
    Ok(recorder.recordings().to_vec())
}

#[tauri::command]
pub async fn delete_recording(id: String, state: State<'_, AppState>) -> Result<bool, String> {
    let mut recorder = state.recorder.lock().await;
    Ok(recorder.delete(&id))
}

#[tauri::command]
pub async fn recording_elapsed(state: State<'_, AppState>) -> Result<Option<i64>, String> {
    let recorder = state.recorder.lock().await;
    Ok(recorder.elapsed_ms(Utc::now()))
}

// Speech

#[tauri::command]
pub async fn speak_text(
    text: String,
    options: Option<TtsOptions>,
    api_key: Option<String>,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<(), String> {
    speech::speak(
        &app,
        &state.playback,
        &text,
        options.unwrap_or_default(),
        api_key,
    )
    .await
}

#[tauri::command]
pub async fn stop_speech(state: State<'_, AppState>, app: AppHandle) -> Result<(), String> {
    speech::stop(&app, &state.playback).await
}

#[tauri::command]
pub async fn is_speaking(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.playback.lock().await.is_playing())
}

// Notification settings

#[tauri::command]
pub async fn get_notification_settings(
    state: State<'_, AppState>,
) -> Result<NotificationSettings, String> {
    Ok(state.notification_settings.lock().await.clone())
}

#[tauri::command]
pub async fn update_notification_settings(
    settings: NotificationSettings,
    state: State<'_, AppState>,
    app: AppHandle,
) -> Result<NotificationSettings, String> {
    notifications::save_settings(&settings)?;
    {
        let mut current = state.notification_settings.lock().await;
        *current = settings.clone();
    }
    send_log(&app, "info", "Notification settings updated");
    Ok(settings)
}

// Vision boards

#[tauri::command]
pub async fn create_vision_board(
    board: NewVisionBoard,
    state: State<'_, AppState>,
) -> Result<VisionBoard, String> {
    let user_id = state.require_user().await?;
    if board.title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    state.db.create_board(&user_id, &board).await
}

#[tauri::command]
pub async fn get_vision_boards(state: State<'_, AppState>) -> Result<Vec<VisionBoard>, String> {
    let user_id = state.require_user().await?;
    state.db.list_boards(&user_id).await
}

#[tauri::command]
pub async fn update_vision_board(
    id: i64,
    updates: VisionBoardUpdate,
    state: State<'_, AppState>,
) -> Result<VisionBoard, String> {
    let user_id = state.require_user().await?;
    state.db.update_board(&user_id, id, &updates).await
}

#[tauri::command]
pub async fn delete_vision_board(id: i64, state: State<'_, AppState>) -> Result<(), String> {
    let user_id = state.require_user().await?;
    state.db.delete_board(&user_id, id).await
}

#[tauri::command]
pub async fn set_favorite_board(
    id: i64,
    favorite: bool,
    state: State<'_, AppState>,
) -> Result<VisionBoard, String> {
    let user_id = state.require_user().await?;
    state.db.set_favorite_board(&user_id, id, favorite).await
}

#[tauri::command]
pub async fn add_board_item(
    item: NewVisionBoardItem,
    state: State<'_, AppState>,
) -> Result<VisionBoardItem, String> {
    let user_id = state.require_user().await?;
    state.db.add_item(&user_id, &item).await
}

#[tauri::command]
pub async fn get_board_items(
    board_id: i64,
    state: State<'_, AppState>,
) -> Result<Vec<VisionBoardItem>, String> {
    let user_id = state.require_user().await?;
    state.db.list_board_items(&user_id, board_id).await
}

#[tauri::command]
pub async fn update_board_item(
    id: i64,
    updates: VisionBoardItemUpdate,
    state: State<'_, AppState>,
) -> Result<VisionBoardItem, String> {
    let user_id = state.require_user().await?;
    state.db.update_item(&user_id, id, &updates).await
}

#[tauri::command]
pub async fn delete_board_item(id: i64, state: State<'_, AppState>) -> Result<(), String> {
    let user_id = state.require_user().await?;
    state.db.delete_item(&user_id, id).await
}

// Board editor

#[tauri::command]
pub async fn editor_set_items(
    items: Vec<DraggableItem>,
    state: State<'_, AppState>,
) -> Result<(), String> {
    let mut editor = state.editor.lock().await;
    editor.set_items(items);
    Ok(())
}

#[tauri::command]
pub async fn editor_items(state: State<'_, AppState>) -> Result<Vec<DraggableItem>, String> {
    let editor = state.editor.lock().await;
    Ok(editor.items().to_vec())
}

#[tauri::command]
pub async fn editor_begin_drag(
    item: DraggableItem,
    offset: Point,
    state: State<'_, AppState>,
) -> Result<DragState, String> {
    let mut editor = state.editor.lock().await;
    editor.begin_drag(item, offset);
    Ok(editor.drag_state().clone())
}

#[tauri::command]
pub async fn editor_end_drag(state: State<'_, AppState>) -> Result<DragState, String> {
    let mut editor = state.editor.lock().await;
    editor.end_drag();
    Ok(editor.drag_state().clone())
}

#[tauri::command]
pub async fn editor_drop(
    item: DraggableItem,
    target_index: Option<usize>,
    target_position: Option<Point>,
    state: State<'_, AppState>,
) -> Result<Vec<DraggableItem>, String> {
    let mut editor = state.editor.lock().await;
    editor.drop_item(item, target_index, target_position);
    Ok(editor.items().to_vec())
}

#[tauri::command]
pub async fn editor_reorder(
    from: usize,
    to: usize,
    state: State<'_, AppState>,
) -> Result<Vec<DraggableItem>, String> {
    let mut editor = state.editor.lock().await;
    editor.reorder(from, to);
    Ok(editor.items().to_vec())
}

#[tauri::command]
pub async fn editor_add_item(
    item: DraggableItem,
    state: State<'_, AppState>,
) -> Result<Vec<DraggableItem>, String> {
    let mut editor = state.editor.lock().await;
    editor.add_item(item);
    Ok(editor.items().to_vec())
}

#[tauri::command]
pub async fn editor_remove_item(
    id: String,
    state: State<'_, AppState>,
) -> Result<Vec<DraggableItem>, String> {
    let mut editor = state.editor.lock().await;
    editor.remove_item(&id);
    Ok(editor.items().to_vec())
}

#[tauri::command]
pub async fn editor_update_item(
    id: String,
    updates: DraggableItemUpdate,
    state: State<'_, AppState>,
) -> Result<Vec<DraggableItem>, String> {
    let mut editor = state.editor.lock().await;
    editor.update_item(&id, updates);
    Ok(editor.items().to_vec())
}
