//! Snapshot encoding for persistence, export and import.
//!
//! # Responsibility
//! - Define the export document (`exportedAt` + per-room entries).
//! - Encode/decode the persisted room array.
//! - Read and write export files.
//!
//! # Invariants
//! - Decoded collections always pass `validate_rooms`.
//! - Export entries are id ordered and cover every room.

use crate::model::checklist::Checklist;
use crate::model::photo::Photo;
use crate::model::room::{
    validate_rooms, Room, RoomId, RoomStatus, RoomValidationError, ROOM_COUNT,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name used for every export.
pub const EXPORT_FILE_NAME: &str = "renovations_rooms_1-23.json";

/// Error raised while encoding, decoding or transferring snapshots.
#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// JSON was well-formed but the room collection shape is wrong.
    Invalid(RoomValidationError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot i/o failed: {err}"),
            Self::Json(err) => write!(f, "snapshot json is invalid: {err}"),
            Self::Invalid(err) => write!(f, "snapshot rejected: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<RoomValidationError> for SnapshotError {
    fn from(value: RoomValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// One room inside an export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedRoom {
    pub room: RoomId,
    pub status: RoomStatus,
    pub notes: String,
    pub checklist: Checklist,
    pub photos: Vec<Photo>,
}

impl From<&Room> for ExportedRoom {
    fn from(room: &Room) -> Self {
        Self {
            room: room.id,
            status: room.status,
            notes: room.notes.clone(),
            checklist: room.checklist,
            photos: room.photos.clone(),
        }
    }
}

impl From<ExportedRoom> for Room {
    fn from(entry: ExportedRoom) -> Self {
        Self {
            id: entry.room,
            notes: entry.notes,
            photos: entry.photos,
            status: entry.status,
            checklist: entry.checklist,
        }
    }
}

/// Full export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    /// ISO-8601 UTC timestamp with millisecond precision.
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    pub rooms: Vec<ExportedRoom>,
}

impl ExportSnapshot {
    /// Captures `rooms` as exported at `at`.
    pub fn from_rooms(rooms: &[Room], at: DateTime<Utc>) -> Self {
        Self {
            exported_at: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            rooms: rooms.iter().map(ExportedRoom::from).collect(),
        }
    }

    /// Parses and validates an export document.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Reads and validates an export file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Pretty-printed (2-space) JSON.
    pub fn to_pretty_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes `EXPORT_FILE_NAME` into `dir` and returns the written path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, SnapshotError> {
        let path = dir.as_ref().join(EXPORT_FILE_NAME);
        std::fs::write(&path, self.to_pretty_json()?)?;
        Ok(path)
    }

    /// Converts the export entries back into a validated room collection.
    pub fn into_rooms(self) -> Result<Vec<Room>, RoomValidationError> {
        let rooms: Vec<Room> = self.rooms.into_iter().map(Room::from).collect();
        validate_rooms(&rooms)?;
        Ok(rooms)
    }

    fn validate(&self) -> Result<(), RoomValidationError> {
        if self.rooms.len() != ROOM_COUNT {
            return Err(RoomValidationError::RoomCount(self.rooms.len()));
        }
        for (position, entry) in self.rooms.iter().enumerate() {
            if usize::from(entry.room.get()) != position + 1 {
                return Err(RoomValidationError::RoomOrder {
                    position,
                    found: entry.room,
                });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredRooms {
    Rooms(Vec<Room>),
    Export(ExportSnapshot),
}

/// Serializes the collection in the persisted (array) shape.
pub fn encode_rooms(rooms: &[Room]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(rooms)?)
}

/// Decodes a persisted value.
///
/// Accepts the persisted room array and, as a fallback, an export document.
pub fn decode_rooms(raw: &str) -> Result<Vec<Room>, SnapshotError> {
    let rooms = match serde_json::from_str::<StoredRooms>(raw)? {
        StoredRooms::Rooms(rooms) => rooms,
        StoredRooms::Export(snapshot) => snapshot.rooms.into_iter().map(Room::from).collect(),
    };
    validate_rooms(&rooms)?;
    Ok(rooms)
}
