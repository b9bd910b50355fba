use tauri::{command, State};

use crate::audio::notes::{PianoKey, PIANO_KEYS};
use crate::audio::ToneManager;
use crate::errors::AppError;

#[command]
pub fn get_piano_keys() -> Vec<PianoKey> {
    PIANO_KEYS.to_vec()
}

#[command]
pub fn play_piano_key(tones: State<'_, ToneManager>, note: String) -> Result<(), AppError> {
    tones.play_key(&note)
}

#[command]
pub fn play_slot_tone(tones: State<'_, ToneManager>, slot_index: usize) {
    tones.play_slot(slot_index);
}
