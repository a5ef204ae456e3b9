use chrono::{TimeZone, Utc};
use renovation_core::{
    ChecklistCategory, ExportSnapshot, MemoryStore, PhotoBlob, RoomId, RoomRegistry, RoomStatus,
    SnapshotError, DEFAULT_STORAGE_KEY, EXPORT_FILE_NAME,
};
use std::sync::Arc;

fn room(id: i64) -> RoomId {
    RoomId::new(id).unwrap()
}

async fn populated_registry() -> RoomRegistry<MemoryStore> {
    let mut registry = RoomRegistry::load(Arc::new(MemoryStore::new()));
    registry.set_status(room(1), RoomStatus::Done);
    registry.set_status(room(12), RoomStatus::InProgress);
    registry.set_notes(room(12), "Tile backsplash\nSKU 4471");
    registry.toggle_check(room(12), ChecklistCategory::WindowsDoors);
    registry.toggle_check(room(23), ChecklistCategory::DeepClean);
    registry
        .add_photos(
            room(12),
            [PhotoBlob::from_bytes("wall.jpg", "image/jpeg", vec![9; 64])],
        )
        .await;
    registry
}

#[tokio::test]
async fn export_covers_all_rooms_regardless_of_search() {
    let registry = populated_registry().await;
    assert_eq!(registry.search("backsplash").len(), 1);

    let at = Utc.with_ymd_and_hms(2025, 3, 9, 8, 30, 15).unwrap();
    let snapshot = registry.export_snapshot_at(at);

    assert_eq!(snapshot.exported_at, "2025-03-09T08:30:15.000Z");
    assert_eq!(snapshot.rooms.len(), 23);
    assert_eq!(snapshot.rooms[11].room, room(12));
    assert_eq!(snapshot.rooms[11].notes, "Tile backsplash\nSKU 4471");
    assert_eq!(snapshot.rooms[11].photos.len(), 1);
}

#[tokio::test]
async fn export_json_fed_back_as_stored_value_rebuilds_collection() {
    let registry = populated_registry().await;
    let json = registry.export_snapshot().to_pretty_json().unwrap();

    let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORAGE_KEY, json));
    let reloaded = RoomRegistry::load(store);

    assert_eq!(reloaded.rooms(), registry.rooms());
}

#[tokio::test]
async fn export_file_round_trips_through_import() {
    let dir = tempfile::tempdir().unwrap();
    let registry = populated_registry().await;

    let path = registry.export_snapshot().write_to_dir(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\n  \"rooms\": [\n"));

    let mut target = RoomRegistry::load(Arc::new(MemoryStore::new()));
    target
        .import_snapshot(ExportSnapshot::read_from_file(&path).unwrap())
        .unwrap();

    assert_eq!(target.rooms(), registry.rooms());
    assert_eq!(target.done_count(), 1);
    assert!(target
        .room(room(23))
        .checklist
        .get(ChecklistCategory::DeepClean));
}

#[test]
fn import_rejects_partial_documents() {
    let raw = r#"{"exportedAt":"2025-01-01T00:00:00.000Z","rooms":[]}"#;
    let err = ExportSnapshot::from_json(raw).unwrap_err();
    assert!(matches!(err, SnapshotError::Invalid(_)));
}

#[test]
fn import_rejects_unknown_checklist_keys() {
    let registry = RoomRegistry::load(Arc::new(MemoryStore::new()));
    let json = registry
        .export_snapshot()
        .to_pretty_json()
        .unwrap()
        .replacen("\"Paint\"", "\"Roof\"", 1);

    assert!(matches!(
        ExportSnapshot::from_json(&json),
        Err(SnapshotError::Json(_))
    ));
}
