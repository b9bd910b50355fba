//! Display-ready projection of the song collection.
//!
//! `compute_view` filters by title, buckets by date, and orders buckets
//! newest first. It is pure: the same inputs always give the same groups.

pub mod labels;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Locale, NaiveDate};
use serde::Serialize;

use crate::metrics::total_sessions;
use crate::songs::models::Song;
use crate::songs::DATE_FORMAT;
use labels::label_for_locale;

pub const NO_MATCHES_MESSAGE: &str = "No matches found.";
pub const NO_SONGS_MESSAGE: &str = "No songs yet.";
pub const NO_SONGS_HINT: &str = "Add a track above to start your journey.";

/// Songs sharing one date, in collection order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongGroup {
    pub date: String,
    pub songs: Vec<Song>,
}

pub type GroupedView = Vec<SongGroup>;

pub fn matches_search(song: &Song, search_term: &str) -> bool {
    song.title
        .to_lowercase()
        .contains(&search_term.to_lowercase())
}

pub fn compute_view(songs: &[Song], search_term: &str) -> GroupedView {
    // 1. Filter, 2. group by exact date string in first-seen order
    let mut groups: GroupedView = Vec::new();
    let mut index_by_date: HashMap<&str, usize> = HashMap::new();

    for song in songs.iter().filter(|s| matches_search(s, search_term)) {
        match index_by_date.get(song.date.as_str()) {
            Some(&idx) => groups[idx].songs.push(song.clone()),
            None => {
                index_by_date.insert(song.date.as_str(), groups.len());
                groups.push(SongGroup {
                    date: song.date.clone(),
                    songs: vec![song.clone()],
                });
            }
        }
    }

    // 3. Newest date first; unparseable dates sink to the end, stable
    groups.sort_by(|a, b| {
        let a = NaiveDate::parse_from_str(&a.date, DATE_FORMAT).ok();
        let b = NaiveDate::parse_from_str(&b.date, DATE_FORMAT).ok();
        b.cmp(&a)
    });

    groups
}

/// Memoizes the last view by collection revision and search term.
#[derive(Default)]
pub struct ViewCache {
    key: Option<(u64, String)>,
    view: Arc<GroupedView>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, revision: u64, songs: &[Song], search_term: &str) -> Arc<GroupedView> {
        let hit = matches!(&self.key, Some((rev, term)) if *rev == revision && term == search_term);
        if !hit {
            self.view = Arc::new(compute_view(songs, search_term));
            self.key = Some((revision, search_term.to_string()));
        }
        self.view.clone()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LabeledGroup {
    pub date: String,
    pub label: String,
    pub songs: Vec<Song>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmptyState {
    pub message: &'static str,
    pub hint: Option<&'static str>,
}

/// Everything the song list screen renders.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryView {
    pub groups: Vec<LabeledGroup>,
    pub total_sessions: u32,
    pub empty: Option<EmptyState>,
}

pub fn empty_state(search_term: &str) -> EmptyState {
    if search_term.is_empty() {
        EmptyState {
            message: NO_SONGS_MESSAGE,
            hint: Some(NO_SONGS_HINT),
        }
    } else {
        EmptyState {
            message: NO_MATCHES_MESSAGE,
            hint: None,
        }
    }
}

pub fn library_view(
    songs: &[Song],
    grouped: &[SongGroup],
    search_term: &str,
    today: NaiveDate,
    locale: Locale,
) -> LibraryView {
    let groups: Vec<LabeledGroup> = grouped
        .iter()
        .map(|group| LabeledGroup {
            date: group.date.clone(),
            label: label_for_locale(&group.date, today, locale),
            songs: group.songs.clone(),
        })
        .collect();

    let empty = groups.is_empty().then(|| empty_state(search_term));

    LibraryView {
        groups,
        total_sessions: total_sessions(songs),
        empty,
    }
}
