// Module declarations
mod modules;

use modules::{app_state::AppState, notifications, tauri_commands::*, utils::send_log};

use chrono::{Local, Utc};
use tauri::Manager;
use tokio::time::{interval, MissedTickBehavior};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .target(tauri_plugin_log::Target::new(
                    tauri_plugin_log::TargetKind::Stdout,
                ))
                .build(),
        )
        .plugin(tauri_plugin_notification::init())
        .manage(
            tauri::async_runtime::block_on(AppState::new())
                .expect("Failed to initialize app state"),
        )
        .invoke_handler(tauri::generate_handler![
            sign_in,
            sign_out,
            current_user,
            get_user_profile,
            update_user_profile,
            create_journal_entry,
            get_journal_entries,
            get_journal_entry,
            update_journal_entry,
            delete_journal_entry,
            search_journal_entries,
            log_mood,
            get_mood_logs,
            get_mood_insights,
            delete_mood_log,
            get_mood_distribution,
            get_mood_streak,
            get_dashboard_stats,
            get_weekly_mood_insights,
            send_weekly_insight,
            upload_image,
            upload_voice_note,
            delete_file,
            start_recording,
            push_recording_chunk,
            stop_recording,
            get_recordings,
            delete_recording,
            recording_elapsed,
            speak_text,
            stop_speech,
            is_speaking,
            get_notification_settings,
            update_notification_settings,
            create_vision_board,
            get_vision_boards,
            update_vision_board,
            delete_vision_board,
            set_favorite_board,
            add_board_item,
            get_board_items,
            update_board_item,
            delete_board_item,
            editor_set_items,
            editor_items,
            editor_begin_drag,
            editor_end_drag,
            editor_drop,
            editor_reorder,
            editor_add_item,
            editor_remove_item,
            editor_update_item,
        ])
        .setup(|app| {
            let app_handle = app.handle().clone();

            // Drive the reminder/quote schedule
            setup_notification_timer(app_handle.clone());

            send_log(&app_handle, "info", "SoulSpace initialized successfully");
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

fn setup_notification_timer(app: tauri::AppHandle) {
    tauri::async_runtime::spawn(async move {
        let mut timer = interval(std::time::Duration::from_secs(60));
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            timer.tick().await;

            let state = app.state::<AppState>();
            let settings = state.notification_settings.lock().await.clone();
            let now = Local::now();

            // Daily reminder fires in its configured minute, once per day
            {
                let mut last_fired = state.last_reminder_date.lock().await;
                if notifications::reminder_due(
                    &settings,
                    now.time(),
                    now.date_naive(),
                    *last_fired,
                ) {
                    notifications::send_daily_reminder(&app);
                    *last_fired = Some(now.date_naive());
                }
            }

            // Motivational quotes rotate on their own interval
            if settings.motivational_quotes {
                let mut last_quote = state.last_quote_time.lock().await;
                match *last_quote {
                    None => *last_quote = Some(Utc::now()),
                    Some(_) => {
                        if notifications::quote_due(&settings, Utc::now(), *last_quote) {
                            let mut counter = state.quote_counter.lock().await;
                            notifications::send_quote(&app, *counter);
                            *counter += 1;
                            *last_quote = Some(Utc::now());
                        }
                    }
                }
            }
        }
    });
}
