//! Room registry: the canonical in-memory room collection.
//!
//! # Responsibility
//! - Own the fixed room collection and apply user-intent mutations.
//! - Notify observers after every committed change.
//! - Write the collection through to a `PersistentStore` after a debounce delay.
//! - Expose derived, side-effect free read models.
//!
//! # Invariants
//! - The collection always holds `ROOM_COUNT` rooms in id order.
//! - Mutations replace the collection copy-on-write; snapshots handed out
//!   earlier never change.
//! - Malformed persisted data is discarded in favour of defaults, never
//!   surfaced to callers.
//! - Store failures never affect the in-memory state.

mod debounce;
pub mod progress;

use crate::export::snapshot::{decode_rooms, encode_rooms, ExportSnapshot, SnapshotError};
use crate::model::checklist::ChecklistCategory;
use crate::model::photo::{Photo, PhotoBlob, PhotoId};
use crate::model::room::{default_rooms, Room, RoomId, RoomStatus};
use crate::search::rooms::{filter_rooms, RoomQuery};
use crate::store::PersistentStore;
use chrono::{DateTime, Utc};
use debounce::SaveScheduler;
use log::{debug, error, info, warn};
use progress::RoomsSummary;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

/// Key under which the whole room collection is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "renovation_app_luxury_v1";
/// Quiet period before a pending write reaches the store.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(300);
/// Line appended by [`RoomRegistry::append_sample_task`].
pub const SAMPLE_TASK_LINE: &str = "• Replace bulbs with 3000K LED";
/// Notes written by [`RoomRegistry::set_notes_no_work_needed`].
pub const NO_WORK_NEEDED_NOTE: &str = "No work needed";

/// Construction options for [`RoomRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    pub storage_key: String,
    pub save_delay: Duration,
    /// Runtime used for debounced writes. Falls back to the ambient runtime;
    /// with neither, every write goes straight to the store.
    pub runtime: Option<Handle>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            save_delay: DEFAULT_SAVE_DELAY,
            runtime: None,
        }
    }
}

/// Blob that could not be read during [`RoomRegistry::add_photos`].
#[derive(Debug)]
pub struct PhotoReadFailure {
    pub name: String,
    pub error: std::io::Error,
}

/// Outcome of one photo batch.
#[derive(Debug, Default)]
pub struct AddPhotosReport {
    /// Ids of appended photos, in input order.
    pub added: Vec<PhotoId>,
    /// Blobs dropped from the batch.
    pub failed: Vec<PhotoReadFailure>,
}

type RoomsObserver = Box<dyn Fn(&[Room]) + Send>;

/// Owner of the room collection and its persistence schedule.
pub struct RoomRegistry<S: PersistentStore + 'static> {
    store: Arc<S>,
    storage_key: String,
    rooms: Arc<Vec<Room>>,
    scheduler: SaveScheduler,
    observers: Vec<RoomsObserver>,
}

impl<S: PersistentStore + 'static> RoomRegistry<S> {
    /// Loads the registry from `store` with default options.
    pub fn load(store: Arc<S>) -> Self {
        Self::load_with_options(store, RegistryOptions::default())
    }

    /// Loads the persisted collection, falling back to defaults when it is
    /// absent or malformed.
    pub fn load_with_options(store: Arc<S>, options: RegistryOptions) -> Self {
        let started_at = Instant::now();
        let rooms = match store.load(&options.storage_key) {
            None => {
                info!("event=registry_load module=registry status=ok source=defaults");
                default_rooms()
            }
            Some(raw) => match decode_rooms(&raw) {
                Ok(rooms) => {
                    info!(
                        "event=registry_load module=registry status=ok source=store bytes={} duration_ms={}",
                        raw.len(),
                        started_at.elapsed().as_millis()
                    );
                    rooms
                }
                Err(err) => {
                    warn!(
                        "event=registry_load module=registry status=fallback source=defaults bytes={} error_code={}",
                        raw.len(),
                        snapshot_error_code(&err)
                    );
                    default_rooms()
                }
            },
        };

        let runtime = options.runtime.or_else(|| Handle::try_current().ok());
        if runtime.is_none() {
            debug!("event=registry_load module=registry status=ok save_mode=immediate");
        }

        Self {
            store,
            storage_key: options.storage_key,
            rooms: Arc::new(rooms),
            scheduler: SaveScheduler::new(options.save_delay, runtime),
            observers: Vec::new(),
        }
    }

    /// Current rooms in id order.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Immutable handle to the current collection.
    pub fn snapshot(&self) -> Arc<Vec<Room>> {
        Arc::clone(&self.rooms)
    }

    pub fn room(&self, room_id: RoomId) -> &Room {
        &self.rooms[room_id.index()]
    }

    /// Registers a callback invoked with the new collection after each change.
    pub fn subscribe(&mut self, observer: impl Fn(&[Room]) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Replaces notes verbatim.
    pub fn set_notes(&mut self, room_id: RoomId, text: impl Into<String>) {
        self.room_mut(room_id).notes = text.into();
        self.commit("notes_set", Some(room_id));
    }

    /// Appends [`SAMPLE_TASK_LINE`] on its own line.
    pub fn append_sample_task(&mut self, room_id: RoomId) {
        let notes = &mut self.room_mut(room_id).notes;
        if !notes.is_empty() {
            notes.push('\n');
        }
        notes.push_str(SAMPLE_TASK_LINE);
        self.commit("sample_task_appended", Some(room_id));
    }

    /// Overwrites notes with [`NO_WORK_NEEDED_NOTE`], discarding prior text.
    pub fn set_notes_no_work_needed(&mut self, room_id: RoomId) {
        self.room_mut(room_id).notes = NO_WORK_NEEDED_NOTE.to_string();
        self.commit("notes_no_work_needed", Some(room_id));
    }

    /// Flips one checklist entry and returns its new value.
    pub fn toggle_check(&mut self, room_id: RoomId, category: ChecklistCategory) -> bool {
        let checked = self.room_mut(room_id).checklist.toggle(category);
        self.commit("check_toggled", Some(room_id));
        checked
    }

    pub fn set_status(&mut self, room_id: RoomId, status: RoomStatus) {
        self.room_mut(room_id).status = status;
        self.commit("status_set", Some(room_id));
    }

    /// Reads every blob in order and appends the readable ones in one change.
    ///
    /// Unreadable blobs are dropped and reported; the rest of the batch still
    /// lands. Nothing is committed when no blob could be read.
    pub async fn add_photos(
        &mut self,
        room_id: RoomId,
        blobs: impl IntoIterator<Item = PhotoBlob>,
    ) -> AddPhotosReport {
        let started_at = Instant::now();
        let mut photos = Vec::new();
        let mut report = AddPhotosReport::default();

        for blob in blobs {
            match blob.read().await {
                Ok(bytes) => photos.push(Photo::from_blob_bytes(room_id, &blob, &bytes)),
                Err(err) => {
                    warn!(
                        "event=photo_read module=registry status=error room_id={room_id} error_kind={:?}",
                        err.kind()
                    );
                    report.failed.push(PhotoReadFailure {
                        name: blob.name,
                        error: err,
                    });
                }
            }
        }

        report.added = photos.iter().map(|photo| photo.id.clone()).collect();
        if !photos.is_empty() {
            self.room_mut(room_id).photos.extend(photos);
            self.commit("photos_added", Some(room_id));
        }

        info!(
            "event=photos_add module=registry status=ok room_id={room_id} added={} failed={} duration_ms={}",
            report.added.len(),
            report.failed.len(),
            started_at.elapsed().as_millis()
        );
        report
    }

    /// Removes one photo. Returns `false` (and changes nothing) when absent.
    pub fn remove_photo(&mut self, room_id: RoomId, photo_id: &PhotoId) -> bool {
        let Some(position) = self
            .room(room_id)
            .photos
            .iter()
            .position(|photo| &photo.id == photo_id)
        else {
            return false;
        };

        self.room_mut(room_id).photos.remove(position);
        self.commit("photo_removed", Some(room_id));
        true
    }

    /// Erases persisted state and restores defaults once `confirm` agrees.
    ///
    /// Returns whether the reset happened.
    pub fn reset_all(&mut self, confirm: impl FnOnce() -> bool) -> bool {
        if !confirm() {
            info!("event=registry_reset module=registry status=cancelled");
            return false;
        }

        self.scheduler.cancel();
        self.store.remove(&self.storage_key);
        self.rooms = Arc::new(default_rooms());
        self.commit("registry_reset", None);
        true
    }

    /// Replaces the whole collection with an imported export document.
    pub fn import_snapshot(&mut self, snapshot: ExportSnapshot) -> Result<(), SnapshotError> {
        let rooms = snapshot.into_rooms()?;
        self.rooms = Arc::new(rooms);
        self.commit("snapshot_imported", None);
        Ok(())
    }

    /// Cancels the pending write and persists the current collection now.
    pub fn flush(&mut self) {
        self.scheduler.cancel();
        write_rooms(&*self.store, &self.storage_key, &self.rooms);
    }

    /// Whether a debounced write is still waiting for its delay.
    pub fn has_pending_save(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn done_count(&self) -> usize {
        progress::done_count(&self.rooms)
    }

    pub fn total_photo_count(&self) -> usize {
        progress::total_photo_count(&self.rooms)
    }

    /// Sum of photo sizes in one room; unknown sizes count as zero.
    pub fn total_photo_bytes(&self, room_id: RoomId) -> u64 {
        self.room(room_id).photo_bytes()
    }

    pub fn progress_percent(&self) -> u8 {
        progress::progress_percent(self.done_count(), self.rooms.len())
    }

    pub fn summary(&self) -> RoomsSummary {
        RoomsSummary::of(&self.rooms)
    }

    /// Rooms matching `query` by id or notes, in id order.
    pub fn search(&self, query: &str) -> Vec<&Room> {
        filter_rooms(&self.rooms, &RoomQuery::new(query))
    }

    /// Export document stamped with the current time.
    pub fn export_snapshot(&self) -> ExportSnapshot {
        self.export_snapshot_at(Utc::now())
    }

    pub fn export_snapshot_at(&self, at: DateTime<Utc>) -> ExportSnapshot {
        ExportSnapshot::from_rooms(&self.rooms, at)
    }

    fn room_mut(&mut self, room_id: RoomId) -> &mut Room {
        &mut Arc::make_mut(&mut self.rooms)[room_id.index()]
    }

    fn commit(&mut self, event: &'static str, room_id: Option<RoomId>) {
        match room_id {
            Some(room_id) => {
                debug!("event={event} module=registry status=ok room_id={room_id}")
            }
            None => info!("event={event} module=registry status=ok"),
        }

        for observer in &self.observers {
            observer(&self.rooms);
        }
        self.schedule_save();
    }

    fn schedule_save(&mut self) {
        let store = Arc::clone(&self.store);
        let key = self.storage_key.clone();
        let rooms = Arc::clone(&self.rooms);
        self.scheduler
            .schedule(move || write_rooms(&*store, &key, &rooms));
    }
}

fn write_rooms<S: PersistentStore + ?Sized>(store: &S, key: &str, rooms: &[Room]) {
    let started_at = Instant::now();
    match encode_rooms(rooms) {
        Ok(raw) => {
            store.save(key, &raw);
            debug!(
                "event=registry_save module=registry status=ok bytes={} duration_ms={}",
                raw.len(),
                started_at.elapsed().as_millis()
            );
        }
        Err(err) => {
            error!(
                "event=registry_save module=registry status=error error_code={}",
                snapshot_error_code(&err)
            );
        }
    }
}

fn snapshot_error_code(err: &SnapshotError) -> &'static str {
    match err {
        SnapshotError::Io(_) => "io_failed",
        SnapshotError::Json(_) => "malformed_json",
        SnapshotError::Invalid(_) => "invalid_shape",
    }
}
