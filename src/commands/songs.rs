use tauri::{command, AppHandle, State};
use tauri_plugin_opener::OpenerExt;

use crate::audio::ToneManager;
use crate::errors::AppError;
use crate::library::SongLibrary;
use crate::metrics::PracticeSummary;
use crate::songs::models::{theme_options, FruitTheme, Song, ThemeOption};
use crate::timer::PracticeTimers;
use crate::view::LibraryView;

use super::local_today;

#[command]
pub fn get_songs(library: State<'_, SongLibrary>) -> Vec<Song> {
    library.songs()
}

#[command]
pub fn get_themes() -> Vec<ThemeOption> {
    theme_options()
}

#[command]
pub fn add_song(
    library: State<'_, SongLibrary>,
    title: String,
    date: String,
    theme: FruitTheme,
) -> Result<Song, AppError> {
    library.add(&title, &date, theme)
}

#[command]
pub fn update_progress(
    library: State<'_, SongLibrary>,
    id: String,
    new_count: i64,
) -> Option<Song> {
    library.update_progress(&id, new_count)
}

/// Progress slot click from a song row: plays the slot's note, then updates the count.
#[command]
pub fn click_slot(
    library: State<'_, SongLibrary>,
    tones: State<'_, ToneManager>,
    id: String,
    slot_index: usize,
) -> Option<Song> {
    tones.play_slot(slot_index);
    library.click_slot(&id, slot_index)
}

#[command]
pub fn update_memo(library: State<'_, SongLibrary>, id: String, memo: String) -> Option<Song> {
    library.update_memo(&id, &memo)
}

/// Appends a paused stopwatch's elapsed time to the memo and resets the stopwatch.
/// A running or empty stopwatch leaves the song unchanged.
#[command]
pub fn log_practice_time(
    library: State<'_, SongLibrary>,
    timers: State<'_, PracticeTimers>,
    id: String,
) -> Option<Song> {
    let elapsed = timers.take_paused_elapsed(&id);
    if elapsed == 0 {
        return library.get(&id);
    }
    library.log_practice_time(&id, elapsed)
}

#[command]
pub fn delete_song(
    library: State<'_, SongLibrary>,
    timers: State<'_, PracticeTimers>,
    id: String,
) {
    timers.release(&id);
    library.remove(&id);
}

#[command]
pub fn get_library_view(library: State<'_, SongLibrary>, search: Option<String>) -> LibraryView {
    library.view(search.as_deref().unwrap_or(""), local_today())
}

#[command]
pub fn get_summary(library: State<'_, SongLibrary>) -> PracticeSummary {
    library.summary()
}

#[command]
pub fn open_listen_link(
    app: AppHandle,
    library: State<'_, SongLibrary>,
    id: String,
) -> Result<(), AppError> {
    let Some(song) = library.get(&id) else {
        return Ok(());
    };
    let url = song.listen_url();
    log::info!("[Command] Opening listen link for '{}'", song.title);
    app.opener()
        .open_url(url, None::<&str>)
        .map_err(|e| AppError::Internal(format!("Failed to open link: {}", e)))
}
