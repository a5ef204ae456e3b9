use renovation_core::{
    ChecklistCategory, MemoryStore, PersistentStore, RoomId, RoomRegistry, RoomStatus,
    DEFAULT_STORAGE_KEY, NO_WORK_NEEDED_NOTE, ROOM_COUNT, SAMPLE_TASK_LINE,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn room(id: i64) -> RoomId {
    RoomId::new(id).unwrap()
}

fn fresh_registry() -> (Arc<MemoryStore>, RoomRegistry<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let registry = RoomRegistry::load(Arc::clone(&store));
    (store, registry)
}

fn assert_defaults(registry: &RoomRegistry<MemoryStore>) {
    let rooms = registry.rooms();
    assert_eq!(rooms.len(), ROOM_COUNT);
    for (position, room) in rooms.iter().enumerate() {
        assert_eq!(usize::from(room.id.get()), position + 1);
        assert_eq!(room.status, RoomStatus::Todo);
        assert!(room.notes.is_empty());
        assert!(room.photos.is_empty());
        assert_eq!(room.checklist.checked_count(), 0);
    }
}

#[test]
fn empty_store_loads_default_rooms() {
    let (_, registry) = fresh_registry();
    assert_defaults(&registry);
    assert_eq!(registry.done_count(), 0);
    assert_eq!(registry.progress_percent(), 0);
}

#[test]
fn malformed_stored_value_falls_back_to_defaults() {
    for raw in ["not json", "{}", "[]", r#"[{"id":1}]"#] {
        let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, raw));
        let registry = RoomRegistry::load(store);
        assert_defaults(&registry);
    }
}

#[test]
fn append_sample_task_separates_lines_only_when_needed() {
    let (_, mut registry) = fresh_registry();

    registry.append_sample_task(room(1));
    assert_eq!(registry.room(room(1)).notes, SAMPLE_TASK_LINE);

    registry.set_notes(room(2), "Line 1");
    registry.append_sample_task(room(2));
    assert_eq!(
        registry.room(room(2)).notes,
        "Line 1\n• Replace bulbs with 3000K LED"
    );
}

#[test]
fn no_work_needed_discards_previous_notes() {
    let (_, mut registry) = fresh_registry();
    registry.set_notes(room(5), "patch drywall\nrepaint trim");
    registry.set_notes_no_work_needed(room(5));
    assert_eq!(registry.room(room(5)).notes, NO_WORK_NEEDED_NOTE);
}

#[test]
fn set_notes_is_verbatim_and_leaves_other_rooms_alone() {
    let (_, mut registry) = fresh_registry();
    let text = "  <b>keep</b>\n\n  spacing  ";
    registry.set_notes(room(9), text);

    assert_eq!(registry.room(room(9)).notes, text);
    assert!(registry
        .rooms()
        .iter()
        .filter(|candidate| candidate.id != room(9))
        .all(|candidate| candidate.notes.is_empty()));
}

#[test]
fn toggle_check_twice_restores_value() {
    let (_, mut registry) = fresh_registry();
    let before = registry.room(room(3)).checklist.get(ChecklistCategory::Bathroom);

    assert!(registry.toggle_check(room(3), ChecklistCategory::Bathroom));
    assert!(!registry.toggle_check(room(3), ChecklistCategory::Bathroom));

    assert_eq!(
        registry.room(room(3)).checklist.get(ChecklistCategory::Bathroom),
        before
    );
}

#[test]
fn progress_counts_only_done_rooms() {
    let (_, mut registry) = fresh_registry();
    for id in 1..=5 {
        registry.set_status(room(id), RoomStatus::Done);
    }
    registry.set_status(room(6), RoomStatus::InProgress);

    assert_eq!(registry.done_count(), 5);
    assert_eq!(registry.progress_percent(), 22);
    assert_eq!(
        i64::from(registry.progress_percent()),
        (registry.done_count() as f64 / 23.0 * 100.0).round() as i64
    );

    let summary = registry.summary();
    assert_eq!(summary.done_count, 5);
    assert_eq!(summary.photo_count, 0);
}

#[test]
fn search_matches_id_substring_and_notes() {
    let (_, mut registry) = fresh_registry();
    registry.set_notes(room(4), "Order LED strips");

    let all: Vec<u8> = registry.search("").iter().map(|r| r.id.get()).collect();
    assert_eq!(all, (1..=23).collect::<Vec<u8>>());

    let sevens: Vec<u8> = registry.search("7").iter().map(|r| r.id.get()).collect();
    assert!(sevens.contains(&7));
    assert!(sevens.contains(&17));
    assert!(!sevens.contains(&8));

    let led: Vec<u8> = registry.search("  led ").iter().map(|r| r.id.get()).collect();
    assert_eq!(led, vec![4]);
    assert_eq!(registry.rooms().len(), ROOM_COUNT);
}

#[test]
fn reset_requires_confirmation() {
    let (store, mut registry) = fresh_registry();
    registry.set_status(room(1), RoomStatus::Done);

    assert!(!registry.reset_all(|| false));
    assert_eq!(registry.room(room(1)).status, RoomStatus::Done);
    assert!(store.load(DEFAULT_STORAGE_KEY).is_some());
}

#[test]
fn reset_restores_defaults_and_fresh_load_matches() {
    let (store, mut registry) = fresh_registry();
    registry.set_status(room(1), RoomStatus::Done);
    registry.set_notes(room(2), "x");
    registry.toggle_check(room(3), ChecklistCategory::Paint);

    assert!(registry.reset_all(|| true));
    assert_defaults(&registry);

    let reloaded = RoomRegistry::load(Arc::clone(&store));
    assert_defaults(&reloaded);
    assert_eq!(reloaded.rooms(), registry.rooms());
}

#[test]
fn observers_see_every_committed_change() {
    let (_, mut registry) = fresh_registry();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    registry.subscribe(move |rooms| {
        assert_eq!(rooms.len(), ROOM_COUNT);
        seen.fetch_add(1, Ordering::SeqCst);
    });

    registry.set_status(room(1), RoomStatus::InProgress);
    registry.toggle_check(room(1), ChecklistCategory::Hvac);
    registry.remove_photo(room(1), &"missing".into());

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn snapshots_are_not_affected_by_later_changes() {
    let (_, mut registry) = fresh_registry();
    let before = registry.snapshot();
    registry.set_notes(room(1), "changed");

    assert!(before[0].notes.is_empty());
    assert_eq!(registry.room(room(1)).notes, "changed");
}

#[test]
fn writes_go_straight_through_without_runtime() {
    let (store, mut registry) = fresh_registry();
    registry.set_status(room(2), RoomStatus::Done);

    assert!(!registry.has_pending_save());
    let reloaded = RoomRegistry::load(Arc::clone(&store));
    assert_eq!(reloaded.room(room(2)).status, RoomStatus::Done);
}
