//! Search entry points.
//!
//! # Responsibility
//! - Filter the room collection for type-as-you-search presentation.

pub mod rooms;
