//! Room domain model.
//!
//! # Responsibility
//! - Define the canonical record tracked for each physical room.
//! - Build and validate the fixed room collection.
//!
//! # Invariants
//! - `RoomId` values are always within `1..=ROOM_COUNT`.
//! - A valid collection holds exactly `ROOM_COUNT` rooms in id order.
//! - Room identity is stable and never reassigned.

use crate::model::checklist::{Checklist, ChecklistCategory};
use crate::model::photo::Photo;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Number of rooms tracked by the application.
pub const ROOM_COUNT: usize = 23;

/// Validation error for room identity, checklist shape and collection shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomValidationError {
    /// Room id outside `1..=ROOM_COUNT`.
    InvalidRoomId(i64),
    /// Room id text that is not a number.
    UnparsableRoomId(String),
    /// Checklist key that is not one of the fixed categories.
    UnknownCategory(String),
    /// Checklist without one of the fixed categories.
    MissingCategory(ChecklistCategory),
    /// Status text that is not `todo|in_progress|done`.
    UnknownStatus(String),
    /// Collection does not contain exactly `ROOM_COUNT` rooms.
    RoomCount(usize),
    /// Room at `position` does not carry the expected id.
    RoomOrder { position: usize, found: RoomId },
}

impl Display for RoomValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoomId(value) => {
                write!(f, "room id {value} is outside 1..={ROOM_COUNT}")
            }
            Self::UnparsableRoomId(value) => write!(f, "room id `{value}` is not a number"),
            Self::UnknownCategory(name) => write!(f, "unknown checklist category `{name}`"),
            Self::MissingCategory(category) => {
                write!(f, "missing checklist category `{category}`")
            }
            Self::UnknownStatus(value) => {
                write!(f, "unknown status `{value}`; expected todo|in_progress|done")
            }
            Self::RoomCount(count) => {
                write!(f, "expected {ROOM_COUNT} rooms, found {count}")
            }
            Self::RoomOrder { position, found } => write!(
                f,
                "room at position {position} has id {found}, expected {}",
                position + 1
            ),
        }
    }
}

impl Error for RoomValidationError {}

/// Stable room identifier in `1..=ROOM_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RoomId(u8);

impl RoomId {
    /// Validates and wraps a room number.
    pub fn new(value: i64) -> Result<Self, RoomValidationError> {
        if (1..=ROOM_COUNT as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RoomValidationError::InvalidRoomId(value))
        }
    }

    /// Iterates all room ids in ascending order.
    pub fn all() -> impl Iterator<Item = RoomId> {
        (1..=ROOM_COUNT as u8).map(RoomId)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based position inside a valid collection.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl TryFrom<i64> for RoomId {
    type Error = RoomValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoomId> for u8 {
    fn from(value: RoomId) -> Self {
        value.0
    }
}

impl FromStr for RoomId {
    type Err = RoomValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim().trim_start_matches('#');
        let number = trimmed
            .parse::<i64>()
            .map_err(|_| RoomValidationError::UnparsableRoomId(trimmed.to_string()))?;
        Self::new(number)
    }
}

impl Display for RoomId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renovation progress state of one room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Nothing started yet.
    #[default]
    Todo,
    /// Work is underway.
    InProgress,
    /// Renovation finished.
    Done,
}

impl RoomStatus {
    pub const ALL: [RoomStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire value (`todo|in_progress|done`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Human label used by presentation layers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To-do",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = RoomValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(RoomValidationError::UnknownStatus(other.to_string())),
        }
    }
}

/// One physical room under renovation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Free text, stored verbatim.
    pub notes: String,
    /// Insertion ordered; removal is the only non-append change.
    pub photos: Vec<Photo>,
    pub status: RoomStatus,
    pub checklist: Checklist,
}

impl Room {
    /// Creates a room with empty notes, no photos, `todo` status and an
    /// unchecked checklist.
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            notes: String::new(),
            photos: Vec::new(),
            status: RoomStatus::Todo,
            checklist: Checklist::default(),
        }
    }

    /// Sum of known photo sizes; unknown sizes count as zero.
    pub fn photo_bytes(&self) -> u64 {
        self.photos.iter().map(|photo| photo.size.unwrap_or(0)).sum()
    }
}

/// Builds the default collection of `ROOM_COUNT` rooms.
pub fn default_rooms() -> Vec<Room> {
    RoomId::all().map(Room::new).collect()
}

/// Checks that `rooms` has exactly `ROOM_COUNT` entries with ids in order.
pub fn validate_rooms(rooms: &[Room]) -> Result<(), RoomValidationError> {
    if rooms.len() != ROOM_COUNT {
        return Err(RoomValidationError::RoomCount(rooms.len()));
    }

    for (position, room) in rooms.iter().enumerate() {
        if room.id.index() != position {
            return Err(RoomValidationError::RoomOrder {
                position,
                found: room.id,
            });
        }
    }

    Ok(())
}
