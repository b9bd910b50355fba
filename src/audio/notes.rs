use serde::Serialize;

/// C major scale C4..E5, one note per progress slot.
pub const SLOT_FREQUENCIES: [f32; 10] = [
    261.63, // C4
    293.66, // D4
    329.63, // E4
    349.23, // F4
    392.00, // G4
    440.00, // A4
    493.88, // B4
    523.25, // C5
    587.33, // D5
    659.25, // E5
];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyColor {
    White,
    Black,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PianoKey {
    pub note: &'static str,
    pub freq: f32,
    pub color: KeyColor,
    pub label: Option<&'static str>,
    /// For black keys: the white-key boundary (1..=7) they sit on.
    pub position_index: Option<u8>,
}

const fn white(note: &'static str, freq: f32, label: Option<&'static str>) -> PianoKey {
    PianoKey {
        note,
        freq,
        color: KeyColor::White,
        label,
        position_index: None,
    }
}

const fn black(note: &'static str, freq: f32, position_index: u8) -> PianoKey {
    PianoKey {
        note,
        freq,
        color: KeyColor::Black,
        label: None,
        position_index: Some(position_index),
    }
}

/// One octave C4..C5 for the header keyboard.
pub const PIANO_KEYS: [PianoKey; 13] = [
    white("C4", 261.63, Some("C")),
    black("C#4", 277.18, 1),
    white("D4", 293.66, None),
    black("D#4", 311.13, 2),
    white("E4", 329.63, None),
    white("F4", 349.23, Some("F")),
    black("F#4", 369.99, 4),
    white("G4", 392.00, None),
    black("G#4", 415.30, 5),
    white("A4", 440.00, None),
    black("A#4", 466.16, 6),
    white("B4", 493.88, None),
    white("C5", 523.25, Some("C")),
];

/// Frequency for a progress slot; out-of-range slots fall back to C4.
pub fn slot_frequency(slot_index: usize) -> f32 {
    SLOT_FREQUENCIES
        .get(slot_index)
        .copied()
        .unwrap_or(SLOT_FREQUENCIES[0])
}

pub fn find_key(note: &str) -> Option<&'static PianoKey> {
    PIANO_KEYS.iter().find(|k| k.note.eq_ignore_ascii_case(note))
}
