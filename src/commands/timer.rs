use tauri::{command, State};

use crate::timer::{PracticeTimers, TimerStatus};

#[command]
pub fn toggle_timer(timers: State<'_, PracticeTimers>, id: String) -> TimerStatus {
    timers.toggle(&id)
}

#[command]
pub fn reset_timer(timers: State<'_, PracticeTimers>, id: String) -> TimerStatus {
    timers.reset(&id)
}

#[command]
pub fn get_timer(timers: State<'_, PracticeTimers>, id: String) -> TimerStatus {
    timers.status(&id)
}

/// Called by the UI when a row unmounts without its song being deleted.
#[command]
pub fn release_timer(timers: State<'_, PracticeTimers>, id: String) {
    timers.release(&id);
}
