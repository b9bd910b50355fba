use std::path::Path;

use chrono::{Locale, NaiveDate};
use parking_lot::Mutex;

use crate::config::STORAGE_KEY;
use crate::errors::AppError;
use crate::metrics::PracticeSummary;
use crate::songs::models::{FruitTheme, Song};
use crate::songs::storage::{FileSlot, MemorySlot, StorageSlot};
use crate::songs::SongRepository;
use crate::view::{library_view, LibraryView, ViewCache};

pub type BoxedSlot = Box<dyn StorageSlot>;

/// Managed application state wrapping the song repository and its derived view.
pub struct SongLibrary {
    repo: Mutex<SongRepository<BoxedSlot>>,
    view_cache: Mutex<ViewCache>,
    locale: Locale,
}

impl SongLibrary {
    pub fn new(slot: BoxedSlot, locale: Locale) -> Self {
        Self {
            repo: Mutex::new(SongRepository::open(slot)),
            view_cache: Mutex::new(ViewCache::new()),
            locale,
        }
    }

    /// Opens the file-backed library in `data_dir`, or an in-memory one if the
    /// directory can't be prepared.
    pub fn open_in(data_dir: &Path, locale: Locale) -> Self {
        let slot: BoxedSlot = match FileSlot::new(data_dir, STORAGE_KEY) {
            Ok(slot) => {
                log::info!("[Songs] Using storage at: {:?}", slot.path());
                Box::new(slot)
            }
            Err(e) => {
                log::error!(
                    "[Songs] Cannot use data dir {:?} ({}), changes will not be saved",
                    data_dir,
                    e
                );
                Box::new(MemorySlot::new())
            }
        };
        Self::new(slot, locale)
    }

    pub fn songs(&self) -> Vec<Song> {
        self.repo.lock().songs().as_ref().clone()
    }

    pub fn get(&self, id: &str) -> Option<Song> {
        self.repo.lock().get(id).cloned()
    }

    pub fn add(&self, title: &str, date: &str, theme: FruitTheme) -> Result<Song, AppError> {
        self.repo.lock().add(title, date, theme)
    }

    pub fn update_progress(&self, id: &str, new_count: i64) -> Option<Song> {
        self.repo.lock().update_progress(id, new_count)
    }

    pub fn click_slot(&self, id: &str, slot_index: usize) -> Option<Song> {
        self.repo.lock().click_slot(id, slot_index)
    }

    pub fn update_memo(&self, id: &str, memo: &str) -> Option<Song> {
        self.repo.lock().update_memo(id, memo)
    }

    pub fn log_practice_time(&self, id: &str, elapsed_secs: u64) -> Option<Song> {
        self.repo.lock().log_practice_time(id, elapsed_secs)
    }

    pub fn remove(&self, id: &str) -> bool {
        self.repo.lock().remove(id)
    }

    pub fn summary(&self) -> PracticeSummary {
        PracticeSummary::from_songs(&self.repo.lock().songs())
    }

    pub fn view(&self, search_term: &str, today: NaiveDate) -> LibraryView {
        let (revision, songs) = {
            let repo = self.repo.lock();
            (repo.revision(), repo.songs())
        };
        let grouped = self
            .view_cache
            .lock()
            .get_or_compute(revision, &songs, search_term);
        library_view(&songs, &grouped, search_term, today, self.locale)
    }
}
