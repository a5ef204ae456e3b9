//! Room filter used by the search box.
//!
//! # Responsibility
//! - Match rooms by decimal id or by notes text.
//!
//! # Invariants
//! - Matching is case-insensitive and never mutates the source collection.
//! - Results preserve the input (id) order.
//! - Blank queries match every room.

use crate::model::room::Room;

/// Normalized search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomQuery {
    needle: String,
}

impl RoomQuery {
    /// Trims and lowercases raw user input.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            needle: text.as_ref().trim().to_lowercase(),
        }
    }

    /// Returns whether this query matches every room.
    pub fn is_blank(&self) -> bool {
        self.needle.is_empty()
    }

    /// Returns whether `room` matches by id substring or notes substring.
    pub fn matches(&self, room: &Room) -> bool {
        if self.is_blank() {
            return true;
        }
        room.id.to_string().contains(&self.needle)
            || room.notes.to_lowercase().contains(&self.needle)
    }
}

/// Filters `rooms` with `query`, keeping input order.
pub fn filter_rooms<'a>(rooms: &'a [Room], query: &RoomQuery) -> Vec<&'a Room> {
    rooms.iter().filter(|room| query.matches(room)).collect()
}

#[cfg(test)]
mod tests {
    use super::{filter_rooms, RoomQuery};
    use crate::model::room::default_rooms;

    #[test]
    fn blank_query_returns_everything_in_order() {
        let rooms = default_rooms();
        let hits = filter_rooms(&rooms, &RoomQuery::new("   "));
        assert_eq!(hits.len(), rooms.len());
        assert_eq!(hits[0].id.get(), 1);
        assert_eq!(hits[22].id.get(), 23);
    }

    #[test]
    fn id_query_matches_decimal_substring() {
        let rooms = default_rooms();
        let ids: Vec<u8> = filter_rooms(&rooms, &RoomQuery::new("7"))
            .iter()
            .map(|room| room.id.get())
            .collect();
        assert_eq!(ids, vec![7, 17]);
    }

    #[test]
    fn notes_match_ignores_case() {
        let mut rooms = default_rooms();
        rooms[2].notes = "Grout the Shower".to_string();
        let hits = filter_rooms(&rooms, &RoomQuery::new(" SHOWER "));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.get(), 3);
    }
}
