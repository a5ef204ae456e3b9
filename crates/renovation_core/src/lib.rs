//! Core domain logic for the renovation room tracker.
//! This crate is the single source of truth for room state invariants.

pub mod db;
pub mod export;
pub mod format;
pub mod logging;
pub mod model;
pub mod registry;
pub mod search;
pub mod store;

pub use export::snapshot::{ExportSnapshot, ExportedRoom, SnapshotError, EXPORT_FILE_NAME};
pub use format::format_size;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::checklist::{Checklist, ChecklistCategory, CATEGORY_COUNT};
pub use model::photo::{Photo, PhotoBlob, PhotoId};
pub use model::room::{Room, RoomId, RoomStatus, RoomValidationError, ROOM_COUNT};
pub use registry::progress::RoomsSummary;
pub use registry::{
    AddPhotosReport, PhotoReadFailure, RegistryOptions, RoomRegistry, DEFAULT_SAVE_DELAY,
    DEFAULT_STORAGE_KEY, NO_WORK_NEEDED_NOTE, SAMPLE_TASK_LINE,
};
pub use store::{MemoryStore, PersistentStore, SqliteStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
