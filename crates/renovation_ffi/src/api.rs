//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose room tracker use-cases to Dart via FRB.
//! - Own the process-wide registry and the runtime that drives its
//!   debounced writes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every mutation goes through the single open registry.
//! - Room views are plain data; Dart never holds core types.

use log::{info, warn};
use renovation_core::{
    core_version as core_version_inner, format_size, init_logging as init_logging_inner,
    ChecklistCategory, ExportSnapshot, PhotoBlob, PhotoId, RegistryOptions, Room, RoomId,
    RoomRegistry, RoomStatus, SqliteStore,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use tokio::runtime::Runtime;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static REGISTRY: Mutex<Option<RoomRegistry<SqliteStore>>> = Mutex::new(None);

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One checklist row of a room view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItemView {
    /// Display label, e.g. `Windows/Doors`.
    pub category: String,
    pub checked: bool,
}

/// Photo metadata plus its data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoView {
    pub id: String,
    pub name: String,
    /// Byte size; `None` for records persisted without one.
    pub size: Option<u64>,
    pub mime_type: String,
    pub url: String,
}

/// Flattened room for list and detail screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomView {
    pub room: u8,
    /// Stable status key (`todo|in_progress|done`).
    pub status: String,
    /// Human label (`To-do|In progress|Done`).
    pub status_label: String,
    pub notes: String,
    pub checklist: Vec<ChecklistItemView>,
    pub photos: Vec<PhotoView>,
    /// Formatted total photo size, e.g. `1.5 KB`.
    pub photo_size_label: String,
}

/// Header numbers for the room list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomsSummaryView {
    pub room_count: u32,
    pub done_count: u32,
    pub photo_count: u32,
    pub progress_percent: u8,
}

/// Room list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomsListResponse {
    pub ok: bool,
    /// Rooms matching the query, in room order.
    pub items: Vec<RoomView>,
    pub message: String,
}

/// Generic action response envelope for room mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Updated room, when the action targets one.
    pub room: Option<RoomView>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RoomActionResponse {
    fn success(message: impl Into<String>, room: Option<RoomView>) -> Self {
        Self {
            ok: true,
            room,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            room: None,
            message: message.into(),
        }
    }
}

/// Opens (or reopens) the room store at `db_path`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - A previously open registry is flushed before it is replaced.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_open(db_path: String) -> String {
    match open_registry(db_path.trim()) {
        Ok(()) => String::new(),
        Err(err) => format!("rooms_open failed: {err}"),
    }
}

/// Lists rooms whose number or notes match `query`; blank lists all.
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_list(query: String) -> RoomsListResponse {
    let result = with_registry(|registry| {
        Ok(registry
            .search(&query)
            .into_iter()
            .map(to_room_view)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => RoomsListResponse {
            ok: true,
            message: format!("{} room(s).", items.len()),
            items,
        },
        Err(err) => RoomsListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("rooms_list failed: {err}"),
        },
    }
}

/// Returns progress header numbers, or `None` before [`rooms_open`].
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_summary() -> Option<RoomsSummaryView> {
    with_registry(|registry| {
        let summary = registry.summary();
        Ok(RoomsSummaryView {
            room_count: summary.room_count as u32,
            done_count: summary.done_count as u32,
            photo_count: summary.photo_count as u32,
            progress_percent: summary.progress_percent,
        })
    })
    .ok()
}

/// Sets a room status from its stable key.
#[flutter_rust_bridge::frb(sync)]
pub fn room_set_status(room: i64, status: String) -> RoomActionResponse {
    room_action("room_set_status", room, |registry, room_id| {
        let status: RoomStatus = status.parse().map_err(|err| format!("{err}"))?;
        registry.set_status(room_id, status);
        Ok(format!("Status set to {}.", status.label()))
    })
}

/// Flips one checklist category.
#[flutter_rust_bridge::frb(sync)]
pub fn room_toggle_check(room: i64, category: String) -> RoomActionResponse {
    room_action("room_toggle_check", room, |registry, room_id| {
        let category: ChecklistCategory = category.parse().map_err(|err| format!("{err}"))?;
        let checked = registry.toggle_check(room_id, category);
        Ok(format!("{category} {}.", if checked { "checked" } else { "unchecked" }))
    })
}

/// Replaces room notes verbatim.
#[flutter_rust_bridge::frb(sync)]
pub fn room_set_notes(room: i64, notes: String) -> RoomActionResponse {
    room_action("room_set_notes", room, |registry, room_id| {
        registry.set_notes(room_id, notes);
        Ok("Notes saved.".to_string())
    })
}

/// Appends the sample task line to room notes.
#[flutter_rust_bridge::frb(sync)]
pub fn room_append_sample_task(room: i64) -> RoomActionResponse {
    room_action("room_append_sample_task", room, |registry, room_id| {
        registry.append_sample_task(room_id);
        Ok("Sample task added.".to_string())
    })
}

/// Overwrites room notes with the no-work marker.
#[flutter_rust_bridge::frb(sync)]
pub fn room_mark_no_work_needed(room: i64) -> RoomActionResponse {
    room_action("room_mark_no_work_needed", room, |registry, room_id| {
        registry.set_notes_no_work_needed(room_id);
        Ok("Marked as no work needed.".to_string())
    })
}

/// Reads image files and attaches them to a room.
///
/// # FFI contract
/// - Sync call; blocks on file reads.
/// - Unreadable files are skipped and named in `message`.
#[flutter_rust_bridge::frb(sync)]
pub fn room_add_photos(room: i64, paths: Vec<String>) -> RoomActionResponse {
    let runtime = match runtime() {
        Ok(runtime) => runtime,
        Err(err) => return RoomActionResponse::failure(format!("room_add_photos failed: {err}")),
    };
    room_action("room_add_photos", room, |registry, room_id| {
        let report = runtime.block_on(async {
            let mut blobs = Vec::with_capacity(paths.len());
            for path in &paths {
                blobs.push(PhotoBlob::from_path(PathBuf::from(path)).await);
            }
            registry.add_photos(room_id, blobs).await
        });
        let mut message = format!("Added {} photo(s).", report.added.len());
        if !report.failed.is_empty() {
            let skipped = report
                .failed
                .iter()
                .map(|failure| failure.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            message.push_str(&format!(" Skipped: {skipped}."));
        }
        Ok(message)
    })
}

/// Removes one photo by id; unknown ids leave the room unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn room_remove_photo(room: i64, photo_id: String) -> RoomActionResponse {
    room_action("room_remove_photo", room, |registry, room_id| {
        if registry.remove_photo(room_id, &PhotoId::from(photo_id)) {
            Ok("Photo removed.".to_string())
        } else {
            Ok("Photo not found.".to_string())
        }
    })
}

/// Writes the export document into `dir` and returns its path.
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_export(dir: String) -> RoomActionResponse {
    let result = with_registry(|registry| {
        registry
            .export_snapshot()
            .write_to_dir(dir.trim())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(path) => RoomActionResponse::success(path.display().to_string(), None),
        Err(err) => RoomActionResponse::failure(format!("rooms_export failed: {err}")),
    }
}

/// Replaces every room with the contents of an export file.
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_import(file: String) -> RoomActionResponse {
    let result = with_registry(|registry| {
        let snapshot =
            ExportSnapshot::read_from_file(file.trim()).map_err(|err| err.to_string())?;
        registry.import_snapshot(snapshot).map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => RoomActionResponse::success("Rooms imported.", None),
        Err(err) => RoomActionResponse::failure(format!("rooms_import failed: {err}")),
    }
}

/// Clears all data once the UI has confirmed.
///
/// `confirmed=false` is a no-op that still reports `ok`.
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_reset(confirmed: bool) -> RoomActionResponse {
    match with_registry(|registry| Ok(registry.reset_all(|| confirmed))) {
        Ok(true) => RoomActionResponse::success("All rooms reset.", None),
        Ok(false) => RoomActionResponse::success("Reset cancelled.", None),
        Err(err) => RoomActionResponse::failure(format!("rooms_reset failed: {err}")),
    }
}

/// Writes any pending change now; call before the app is suspended.
#[flutter_rust_bridge::frb(sync)]
pub fn rooms_flush() -> String {
    match with_registry(|registry| {
        registry.flush();
        Ok(())
    }) {
        Ok(()) => String::new(),
        Err(err) => format!("rooms_flush failed: {err}"),
    }
}

fn runtime() -> Result<&'static Runtime, String> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let built = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("renovation-save")
        .enable_time()
        .build()
        .map_err(|err| format!("runtime init failed: {err}"))?;
    // A concurrent caller may have won; its runtime is kept and ours dropped.
    let _ = RUNTIME.set(built);
    RUNTIME
        .get()
        .ok_or_else(|| "runtime init failed".to_string())
}

fn open_registry(db_path: &str) -> Result<(), String> {
    if db_path.is_empty() {
        return Err("db_path must not be empty".to_string());
    }
    let runtime = runtime()?;
    let mut slot = REGISTRY
        .lock()
        .map_err(|_| "registry lock poisoned".to_string())?;
    // Reopening the same file must observe the previous registry's writes.
    if let Some(mut previous) = slot.take() {
        previous.flush();
    }

    let store = SqliteStore::open(db_path).map_err(|err| err.to_string())?;
    let options = RegistryOptions {
        runtime: Some(runtime.handle().clone()),
        ..RegistryOptions::default()
    };
    *slot = Some(RoomRegistry::load_with_options(Arc::new(store), options));
    info!("event=ffi_rooms_open module=ffi status=ok");
    Ok(())
}

fn with_registry<T>(
    f: impl FnOnce(&mut RoomRegistry<SqliteStore>) -> Result<T, String>,
) -> Result<T, String> {
    let mut slot = REGISTRY
        .lock()
        .map_err(|_| "registry lock poisoned".to_string())?;
    match slot.as_mut() {
        Some(registry) => f(registry),
        None => Err("rooms not opened; call rooms_open first".to_string()),
    }
}

fn room_action(
    name: &str,
    room: i64,
    f: impl FnOnce(&mut RoomRegistry<SqliteStore>, RoomId) -> Result<String, String>,
) -> RoomActionResponse {
    let result = with_registry(|registry| {
        let room_id = RoomId::new(room).map_err(|err| err.to_string())?;
        let message = f(registry, room_id)?;
        Ok((message, to_room_view(registry.room(room_id))))
    });
    match result {
        Ok((message, view)) => RoomActionResponse::success(message, Some(view)),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call={name} room={room}");
            RoomActionResponse::failure(format!("{name} failed: {err}"))
        }
    }
}

fn to_room_view(room: &Room) -> RoomView {
    RoomView {
        room: room.id.get(),
        status: room.status.as_str().to_string(),
        status_label: room.status.label().to_string(),
        notes: room.notes.clone(),
        checklist: room
            .checklist
            .iter()
            .map(|(category, checked)| ChecklistItemView {
                category: category.as_str().to_string(),
                checked,
            })
            .collect(),
        photos: room
            .photos
            .iter()
            .map(|photo| PhotoView {
                id: photo.id.to_string(),
                name: photo.name.clone(),
                size: photo.size,
                mime_type: photo.mime_type.clone(),
                url: photo.url.clone(),
            })
            .collect(),
        photo_size_label: format_size(room.photo_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, room_add_photos, room_append_sample_task, room_remove_photo,
        room_set_status, room_toggle_check, rooms_export, rooms_flush, rooms_import, rooms_list,
        rooms_open, rooms_reset, rooms_summary,
    };
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // The registry is process-global; tests that open it run one at a time.
    static SERIAL: Mutex<()> = Mutex::new(());

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn rooms_open_rejects_blank_path() {
        assert!(!rooms_open("  ".to_string()).is_empty());
    }

    #[test]
    fn mutations_update_views_and_survive_reopen() {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = unique_dir("ffi-reopen");
        let db = dir.join("rooms.sqlite3").display().to_string();
        assert_eq!(rooms_open(db.clone()), "");

        let status = room_set_status(7, "in_progress".to_string());
        assert!(status.ok, "{}", status.message);
        assert_eq!(
            status.room.as_ref().map(|room| room.status_label.as_str()),
            Some("In progress")
        );

        let check = room_toggle_check(7, "paint".to_string());
        let view = check.room.expect("toggle returns room view");
        assert!(view.checklist.iter().any(|item| item.category == "Paint" && item.checked));

        let task = room_append_sample_task(17);
        assert_eq!(
            task.room.map(|room| room.notes),
            Some("• Replace bulbs with 3000K LED".to_string())
        );

        let listed = rooms_list("7".to_string());
        let ids: Vec<u8> = listed.items.iter().map(|room| room.room).collect();
        assert_eq!(ids, vec![7, 17]);

        assert_eq!(rooms_flush(), "");
        assert_eq!(rooms_open(db), "");
        let reopened = rooms_list(String::new());
        assert_eq!(reopened.items.len(), 23);
        assert_eq!(reopened.items[6].status, "in_progress");
        assert_eq!(rooms_summary().map(|summary| summary.done_count), Some(0));
    }

    #[test]
    fn invalid_inputs_fail_without_panicking() {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = unique_dir("ffi-invalid");
        assert_eq!(rooms_open(dir.join("rooms.sqlite3").display().to_string()), "");

        assert!(!room_set_status(0, "done".to_string()).ok);
        assert!(!room_set_status(24, "done".to_string()).ok);
        assert!(!room_set_status(3, "finished".to_string()).ok);
        assert!(!room_toggle_check(3, "Roof".to_string()).ok);
        assert!(!rooms_import(dir.join("missing.json").display().to_string()).ok);

        let removed = room_remove_photo(3, "3-unknown".to_string());
        assert!(removed.ok);
        assert_eq!(removed.message, "Photo not found.");
    }

    #[test]
    fn photos_export_import_and_reset() {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = unique_dir("ffi-photos");
        assert_eq!(rooms_open(dir.join("rooms.sqlite3").display().to_string()), "");

        let image = dir.join("porch.png");
        std::fs::write(&image, [1u8, 2, 3]).expect("write image");
        let missing = dir.join("gone.png");
        let added = room_add_photos(
            2,
            vec![image.display().to_string(), missing.display().to_string()],
        );
        assert!(added.ok, "{}", added.message);
        assert!(added.message.contains("Skipped: gone.png."));
        let view = added.room.expect("room view");
        assert_eq!(view.photos.len(), 1);
        assert_eq!(view.photos[0].url, "data:image/png;base64,AQID");
        assert_eq!(view.photo_size_label, "3 B");

        let exported = rooms_export(dir.display().to_string());
        assert!(exported.ok, "{}", exported.message);

        assert!(!rooms_reset(false).message.contains("All rooms reset"));
        assert!(rooms_reset(true).ok);
        assert_eq!(rooms_list(String::new()).items[1].photos.len(), 0);

        let imported = rooms_import(exported.message);
        assert!(imported.ok, "{}", imported.message);
        assert_eq!(rooms_list(String::new()).items[1].photos.len(), 1);
    }

    fn unique_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("{prefix}-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }
}
