//! Domain model for room renovation tracking.
//!
//! # Responsibility
//! - Define canonical data structures used by the registry and adapters.
//! - Keep serialized shapes stable for persistence and export.
//!
//! # Invariants
//! - Exactly `ROOM_COUNT` rooms exist, identified by stable `RoomId`s.
//! - Every checklist carries the full fixed category set.

pub mod checklist;
pub mod photo;
pub mod room;
