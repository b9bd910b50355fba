//! End-to-end flows over the song repository, query pipeline, and storage.

use std::collections::HashSet;

use chrono::NaiveDate;
use pianotrack_lib::metrics::total_sessions;
use pianotrack_lib::songs::models::FruitTheme;
use pianotrack_lib::songs::storage::{self, MemorySlot};
use pianotrack_lib::songs::SongRepository;
use pianotrack_lib::view::compute_view;
use pianotrack_lib::view::labels::label_for;

#[test]
fn test_grouping_keeps_creation_order_within_date() {
    let mut repo = SongRepository::open(MemorySlot::new());
    let first = repo.add("Minuet in G", "2024-01-03", FruitTheme::Apple).unwrap();
    let middle = repo.add("Für Elise", "2024-01-01", FruitTheme::Banana).unwrap();
    let second = repo.add("Arabesque", "2024-01-03", FruitTheme::Grape).unwrap();

    let songs = repo.songs();
    let order: Vec<&str> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, [second.id.as_str(), middle.id.as_str(), first.id.as_str()]);

    let view = compute_view(&songs, "");
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].date, "2024-01-03");
    assert_eq!(view[1].date, "2024-01-01");
    let bucket: Vec<&str> = view[0].songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(bucket, [second.id.as_str(), first.id.as_str()]);
}

#[test]
fn test_search_scenario() {
    let mut repo = SongRepository::open(MemorySlot::new());
    repo.add("Clair de Lune", "2024-02-01", FruitTheme::Orange).unwrap();
    repo.add("Moonlight Sonata", "2024-02-02", FruitTheme::Strawberry).unwrap();

    let view = compute_view(&repo.songs(), "moon");

    let titles: Vec<&str> = view
        .iter()
        .flat_map(|g| g.songs.iter().map(|s| s.title.as_str()))
        .collect();
    assert_eq!(titles, ["Moonlight Sonata"]);
}

#[test]
fn test_invariants_hold_after_mixed_operations() {
    let slot = MemorySlot::new();
    let mut repo = SongRepository::open(slot.clone());

    let mut ids = Vec::new();
    for (i, title) in ["Etude", "Waltz", "Nocturne", "Prelude"].iter().enumerate() {
        let date = format!("2024-03-0{}", i + 1);
        ids.push(repo.add(title, &date, FruitTheme::Apple).unwrap().id);
    }
    repo.update_progress(&ids[0], 42);
    repo.update_progress(&ids[1], -7);
    repo.click_slot(&ids[2], 99);
    repo.remove(&ids[3]);
    repo.remove(&ids[3]);

    let songs = repo.songs();
    assert!(songs.iter().all(|s| s.practice_count <= 10));
    let unique: HashSet<&str> = songs.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(unique.len(), songs.len());
    assert_eq!(total_sessions(&songs), 20);

    // Whatever is in memory is exactly what a fresh load sees
    assert_eq!(storage::load(&slot), *songs);
}

#[test]
fn test_progress_toggle_scenario() {
    let mut repo = SongRepository::open(MemorySlot::new());
    let id = repo.add("Minuet in G", "2024-05-01", FruitTheme::Apple).unwrap().id;
    repo.update_progress(&id, 1);

    let song = repo.click_slot(&id, 0).unwrap();

    assert_eq!(song.practice_count, 0);
}

#[test]
fn test_corrupt_storage_starts_empty_and_recovers() {
    let slot = MemorySlot::with_contents("{not json");
    let mut repo = SongRepository::open(slot.clone());
    assert!(repo.is_empty());

    repo.add("Gymnopédie No. 1", "2024-04-04", FruitTheme::Grape).unwrap();

    assert_eq!(storage::load(&slot).len(), 1);
}

#[test]
fn test_date_label_scenario() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    assert_eq!(label_for("2024-06-15", today), "Today");
    assert_eq!(label_for("2024-06-14", today), "Yesterday");
    assert_eq!(label_for("2024-06-01", today), "Saturday, June 1, 2024");
}
