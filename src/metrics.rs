use serde::Serialize;

use crate::songs::models::Song;

/// Sum of practice counts across the whole collection, ignoring any search filter.
pub fn total_sessions(songs: &[Song]) -> u32 {
    songs.iter().map(|s| s.practice_count as u32).sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PracticeSummary {
    pub total_sessions: u32,
    pub song_count: usize,
    pub mastered_count: usize,
}

impl PracticeSummary {
    pub fn from_songs(songs: &[Song]) -> Self {
        Self {
            total_sessions: total_sessions(songs),
            song_count: songs.len(),
            mastered_count: songs.iter().filter(|s| s.is_mastered()).count(),
        }
    }
}
