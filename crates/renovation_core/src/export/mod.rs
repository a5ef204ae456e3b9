//! JSON snapshot export and import.
//!
//! # Responsibility
//! - Produce the user-facing export document and file.
//! - Own the persisted collection encoding shared with the registry.
//!
//! # See also
//! - `registry::RoomRegistry::export_snapshot`

pub mod snapshot;
