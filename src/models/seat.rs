use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Free,
    Booked,
}

/// One seat status record from `GET /api/showtimes/{id}/seats`.
///
/// Seat ids are unique within a showtime's seat map. The client never
/// flips a seat to `Booked` on its own; status only changes by
/// re-fetching the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_id: i64,
    pub row_label: String,
    pub seat_number: u32,
    pub status: SeatStatus,
}

impl Seat {
    pub fn is_booked(&self) -> bool {
        self.status == SeatStatus::Booked
    }

    /// Display label, e.g. "A12".
    pub fn label(&self) -> String {
        format!("{}{}", self.row_label, self.seat_number)
    }
}
