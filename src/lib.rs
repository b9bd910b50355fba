pub mod audio;
pub mod commands;
pub mod config;
pub mod errors;
pub mod library;
pub mod metrics;
pub mod songs;
pub mod timer;
pub mod view;

use audio::ToneManager;
use config::TrackerConfig;
use library::SongLibrary;
use tauri::{Emitter, Manager};
use timer::PracticeTimers;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let config = TrackerConfig::load();
            let data_dir = app.path().app_data_dir()?;

            let library = SongLibrary::open_in(&data_dir, config.chrono_locale());

            let handle = app.handle().clone();
            let timers = PracticeTimers::new(move |tick| {
                if let Err(e) = handle.emit(commands::PRACTICE_TICK_EVENT, tick) {
                    log::warn!("[Timer] Failed to emit tick: {}", e);
                }
            });

            app.manage(library);
            app.manage(timers);
            app.manage(ToneManager::new(&config));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::songs::get_songs,
            commands::songs::get_themes,
            commands::songs::add_song,
            commands::songs::update_progress,
            commands::songs::click_slot,
            commands::songs::update_memo,
            commands::songs::log_practice_time,
            commands::songs::delete_song,
            commands::songs::get_library_view,
            commands::songs::get_summary,
            commands::songs::open_listen_link,
            commands::timer::toggle_timer,
            commands::timer::reset_timer,
            commands::timer::get_timer,
            commands::timer::release_timer,
            commands::tones::get_piano_keys,
            commands::tones::play_piano_key,
            commands::tones::play_slot_tone
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
