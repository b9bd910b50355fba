pub mod models;
pub mod storage;

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::MAX_SLOTS;
use crate::errors::AppError;
use crate::timer::format_practice_entry;
use models::{FruitTheme, Song};
use storage::StorageSlot;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Owns the song collection and is the only writer of its storage slot.
///
/// Every mutation that changes the collection installs a fresh snapshot,
/// bumps `revision`, and writes the whole collection back. Snapshots handed
/// out earlier are never modified.
pub struct SongRepository<S: StorageSlot> {
    songs: Arc<Vec<Song>>,
    revision: u64,
    slot: S,
}

impl<S: StorageSlot> SongRepository<S> {
    /// Loads the collection from `slot`. Nothing is written until the first mutation.
    pub fn open(slot: S) -> Self {
        let songs = storage::load(&slot);
        log::info!("[Songs] Loaded {} songs", songs.len());
        Self {
            songs: Arc::new(songs),
            revision: 0,
            slot,
        }
    }

    pub fn songs(&self) -> Arc<Vec<Song>> {
        self.songs.clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.songs.iter().find(|s| s.id == id)
    }

    pub fn add(&mut self, title: &str, date: &str, theme: FruitTheme) -> Result<Song, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Title must not be empty"));
        }
        if NaiveDate::parse_from_str(date, DATE_FORMAT).is_err() {
            return Err(AppError::validation(format!(
                "Date '{}' is not a valid YYYY-MM-DD date",
                date
            )));
        }

        let song = Song {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            date: date.to_string(),
            theme,
            practice_count: 0,
            memo: String::new(),
        };

        // Add to top of list
        let mut next = Vec::with_capacity(self.songs.len() + 1);
        next.push(song.clone());
        next.extend(self.songs.iter().cloned());
        self.commit(next);

        log::info!("[Songs] Added '{}' on {}", song.title, song.date);
        Ok(song)
    }

    /// Sets the practice count, saturating into `0..=MAX_SLOTS`.
    pub fn update_progress(&mut self, id: &str, new_count: i64) -> Option<Song> {
        let count = saturate_count(new_count);
        if count as i64 != new_count {
            log::warn!(
                "[Songs] Progress {} for {} out of range, saturating to {}",
                new_count,
                id,
                count
            );
        }
        self.modify(id, |song| song.practice_count = count)
    }

    /// Applies a click on progress slot `slot_index` (0-based).
    ///
    /// Clicking slot N sets the count to N + 1, except that clicking the
    /// first slot while the count is exactly 1 clears it back to 0.
    pub fn click_slot(&mut self, id: &str, slot_index: usize) -> Option<Song> {
        let current = self.get(id)?.practice_count;
        let new_count = slot_index as i64 + 1;
        if new_count == 1 && current == 1 {
            return self.update_progress(id, 0);
        }
        self.update_progress(id, new_count)
    }

    pub fn update_memo(&mut self, id: &str, memo: &str) -> Option<Song> {
        self.modify(id, |song| song.memo = memo.to_string())
    }

    /// Appends a practice-time entry to the song's memo.
    pub fn log_practice_time(&mut self, id: &str, elapsed_secs: u64) -> Option<Song> {
        let entry = format_practice_entry(elapsed_secs);
        self.modify(id, |song| {
            song.memo = if song.memo.is_empty() {
                entry
            } else {
                format!("{} {}", song.memo.trim(), entry)
            };
        })
    }

    /// Removes the song with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            log::debug!("[Songs] Remove ignored, no song {}", id);
            return false;
        }
        let next: Vec<Song> = self.songs.iter().filter(|s| s.id != id).cloned().collect();
        self.commit(next);
        log::info!("[Songs] Removed {}", id);
        true
    }

    fn modify(&mut self, id: &str, apply: impl FnOnce(&mut Song)) -> Option<Song> {
        let Some(index) = self.songs.iter().position(|s| s.id == id) else {
            log::debug!("[Songs] Update ignored, no song {}", id);
            return None;
        };

        let mut next = self.songs.as_ref().clone();
        apply(&mut next[index]);
        let updated = next[index].clone();
        if updated != self.songs[index] {
            self.commit(next);
        }
        Some(updated)
    }

    fn commit(&mut self, next: Vec<Song>) {
        self.songs = Arc::new(next);
        self.revision += 1;
        // Fire and forget: the in-memory state stays authoritative.
        if let Err(e) = storage::save(&self.slot, &self.songs) {
            log::error!("[Songs] Failed to save songs: {}", e);
        }
    }
}

pub(crate) fn saturate_count(value: i64) -> u8 {
    value.clamp(0, MAX_SLOTS as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use storage::MemorySlot;

    fn repo() -> (SongRepository<MemorySlot>, MemorySlot) {
        let slot = MemorySlot::new();
        (SongRepository::open(slot.clone()), slot)
    }

    #[test]
    fn test_add_to_empty_collection() {
        let (mut repo, slot) = repo();
        let song = repo.add("Minuet in G", "2024-05-01", FruitTheme::Apple).unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(song.practice_count, 0);
        assert_eq!(song.memo, "");
        assert_eq!(song.theme.symbol(), "🍎");
        assert_eq!(repo.songs()[0], song);
        assert!(slot.contents().unwrap().contains("Minuet in G"));
    }

    #[test]
    fn test_add_prepends_with_unique_ids() {
        let (mut repo, _) = repo();
        let first = repo.add("First", "2024-01-01", FruitTheme::Apple).unwrap();
        let second = repo.add("Second", "2024-01-01", FruitTheme::Grape).unwrap();

        let songs = repo.songs();
        assert_eq!(songs[0].id, second.id);
        assert_eq!(songs[1].id, first.id);
        let ids: HashSet<_> = songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_title_without_writing() {
        let (mut repo, slot) = repo();

        let err = repo.add("   ", "2024-01-01", FruitTheme::Apple).unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(repo.is_empty());
        assert_eq!(repo.revision(), 0);
        assert!(slot.contents().is_none());
    }

    #[test]
    fn test_add_rejects_bad_date() {
        let (mut repo, _) = repo();
        assert!(repo.add("Etude", "yesterday", FruitTheme::Apple).is_err());
        assert!(repo.add("Etude", "2024-02-30", FruitTheme::Apple).is_err());
        assert!(repo.is_empty());
    }

    #[test]
    fn test_update_progress_saturates() {
        let (mut repo, _) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;

        assert_eq!(repo.update_progress(&id, 14).unwrap().practice_count, 10);
        assert_eq!(repo.update_progress(&id, -3).unwrap().practice_count, 0);
        assert_eq!(repo.update_progress(&id, 6).unwrap().practice_count, 6);
    }

    #[test]
    fn test_update_preserves_identity_and_other_fields() {
        let (mut repo, _) = repo();
        let original = repo.add("Etude", "2024-01-01", FruitTheme::Banana).unwrap();

        let updated = repo.update_progress(&original.id, 4).unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.date, original.date);
        assert_eq!(updated.theme, original.theme);
        assert_eq!(updated.memo, original.memo);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut repo, _) = repo();
        repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap();
        let revision = repo.revision();

        assert!(repo.update_progress("missing", 3).is_none());
        assert!(repo.update_memo("missing", "hi").is_none());
        assert!(repo.click_slot("missing", 0).is_none());
        assert!(!repo.remove("missing"));
        assert_eq!(repo.revision(), revision);
    }

    #[test]
    fn test_click_first_slot_toggles_off() {
        let (mut repo, _) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;

        assert_eq!(repo.click_slot(&id, 0).unwrap().practice_count, 1);
        assert_eq!(repo.click_slot(&id, 0).unwrap().practice_count, 0);
    }

    #[test]
    fn test_click_same_higher_slot_keeps_count() {
        let (mut repo, _) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;

        repo.click_slot(&id, 2);
        assert_eq!(repo.click_slot(&id, 2).unwrap().practice_count, 3);
        assert_eq!(repo.click_slot(&id, 0).unwrap().practice_count, 1);
        assert_eq!(repo.click_slot(&id, 25).unwrap().practice_count, 10);
    }

    #[test]
    fn test_update_memo() {
        let (mut repo, slot) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;

        repo.update_memo(&id, "Focus on bar 12");

        assert_eq!(repo.get(&id).unwrap().memo, "Focus on bar 12");
        assert!(slot.contents().unwrap().contains("Focus on bar 12"));
    }

    #[test]
    fn test_log_practice_time_appends_entry() {
        let (mut repo, _) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;

        assert_eq!(repo.log_practice_time(&id, 42).unwrap().memo, "[Practice: 42s]");

        repo.update_memo(&id, "  bar 12 ");
        assert_eq!(
            repo.log_practice_time(&id, 65).unwrap().memo,
            "bar 12 [Practice: 1m 5s]"
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (mut repo, _) = repo();
        let keep = repo.add("Keep", "2024-01-01", FruitTheme::Apple).unwrap().id;
        let gone = repo.add("Gone", "2024-01-01", FruitTheme::Apple).unwrap().id;

        assert!(repo.remove(&gone));
        let after_first = repo.songs();
        assert!(!repo.remove(&gone));

        assert_eq!(repo.songs(), after_first);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.songs()[0].id, keep);
    }

    #[test]
    fn test_snapshots_are_not_aliased() {
        let (mut repo, _) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;
        let before = repo.songs();
        let revision = repo.revision();

        repo.update_progress(&id, 5);

        assert_eq!(before[0].practice_count, 0);
        assert!(!Arc::ptr_eq(&before, &repo.songs()));
        assert!(repo.revision() > revision);
    }

    #[test]
    fn test_unchanged_update_does_not_bump_revision() {
        let (mut repo, _) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap().id;
        let revision = repo.revision();

        repo.update_memo(&id, "");

        assert_eq!(repo.revision(), revision);
    }

    #[test]
    fn test_reopen_restores_collection() {
        let (mut repo, slot) = repo();
        let id = repo.add("Etude", "2024-01-01", FruitTheme::Grape).unwrap().id;
        repo.update_progress(&id, 3);
        repo.update_memo(&id, "slow hands");

        let reopened = SongRepository::open(slot);

        assert_eq!(reopened.songs(), repo.songs());
    }

    #[test]
    fn test_open_does_not_overwrite_existing_data() {
        let slot = MemorySlot::with_contents(
            r#"[{"id":"a","date":"2024-01-01","title":"Saved","theme":"🍎","practiceCount":2}]"#,
        );
        let before = slot.contents();

        let repo = SongRepository::open(slot.clone());

        assert_eq!(repo.len(), 1);
        assert_eq!(slot.contents(), before);
    }

    /// Slot whose writes always fail, e.g. a read-only data dir.
    struct ReadOnlySlot;

    impl StorageSlot for ReadOnlySlot {
        fn read(&self) -> Result<Option<String>, AppError> {
            Ok(None)
        }

        fn write(&self, _payload: &str) -> Result<(), AppError> {
            Err(AppError::FileSystem("read-only file system".to_string()))
        }
    }

    #[test]
    fn test_failed_write_keeps_in_memory_change() {
        let mut repo = SongRepository::open(ReadOnlySlot);

        let song = repo.add("Etude", "2024-01-01", FruitTheme::Apple).unwrap();
        assert_eq!(repo.revision(), 1);
        assert_eq!(repo.songs()[0], song);

        let updated = repo.update_memo(&song.id, "bar 12").unwrap();
        assert_eq!(updated.memo, "bar 12");
        assert_eq!(repo.revision(), 2);
        assert_eq!(repo.get(&song.id).unwrap().memo, "bar 12");
    }
}
