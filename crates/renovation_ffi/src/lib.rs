//! Flutter-facing bindings for the renovation tracker core.

pub mod api;
