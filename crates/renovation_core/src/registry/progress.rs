//! Derived aggregates over a room collection.

use crate::model::room::{Room, RoomStatus};

/// Header figures shown above the room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomsSummary {
    pub room_count: usize,
    pub done_count: usize,
    pub photo_count: usize,
    /// Rounded share of done rooms, `0..=100`.
    pub progress_percent: u8,
}

impl RoomsSummary {
    pub fn of(rooms: &[Room]) -> Self {
        let done = done_count(rooms);
        Self {
            room_count: rooms.len(),
            done_count: done,
            photo_count: total_photo_count(rooms),
            progress_percent: progress_percent(done, rooms.len()),
        }
    }
}

pub fn done_count(rooms: &[Room]) -> usize {
    rooms
        .iter()
        .filter(|room| room.status == RoomStatus::Done)
        .count()
}

pub fn total_photo_count(rooms: &[Room]) -> usize {
    rooms.iter().map(|room| room.photos.len()).sum()
}

/// `round(done / total * 100)`; an empty collection counts as 0%.
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (done as f64 / total as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{done_count, progress_percent, RoomsSummary};
    use crate::model::room::{default_rooms, RoomStatus};

    #[test]
    fn progress_rounds_to_nearest_percent() {
        assert_eq!(progress_percent(0, 23), 0);
        assert_eq!(progress_percent(5, 23), 22);
        assert_eq!(progress_percent(12, 23), 52);
        assert_eq!(progress_percent(23, 23), 100);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn only_done_rooms_count() {
        let mut rooms = default_rooms();
        rooms[0].status = RoomStatus::Done;
        rooms[1].status = RoomStatus::InProgress;
        assert_eq!(done_count(&rooms), 1);

        let summary = RoomsSummary::of(&rooms);
        assert_eq!(summary.room_count, 23);
        assert_eq!(summary.progress_percent, 4);
    }
}
