//! Seat-chart view model: row grouping and the user's in-progress
//! selection. Everything here is pure so the chart layout is
//! deterministic regardless of the order seats arrive from the API.

use std::collections::BTreeMap;

use crate::models::Seat;

/// One rendered row of the seat chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRow {
    pub label: String,
    pub seats: Vec<Seat>,
}

/// Groups a flat seat sequence into rows keyed by row label. Rows come
/// out in lexicographic label order, seats within a row ascending by
/// seat number. Re-derive this on every seat-map change instead of
/// mutating a previous layout.
pub fn seat_rows(seats: &[Seat]) -> Vec<SeatRow> {
    let mut by_row: BTreeMap<&str, Vec<Seat>> = BTreeMap::new();
    for seat in seats {
        by_row.entry(&seat.row_label).or_default().push(seat.clone());
    }
    by_row
        .into_iter()
        .map(|(label, mut seats)| {
            seats.sort_by_key(|s| s.seat_number);
            SeatRow {
                label: label.to_string(),
                seats,
            }
        })
        .collect()
}

/// Ordered set of seat ids the user intends to book.
///
/// Only ever holds ids of seats reported FREE in the last loaded map;
/// booked seats are rejected at the toggle boundary. Cleared on map
/// reload and on successful booking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<i64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles membership for `seat`. Booked seats are never
    /// selectable; returns whether the set changed.
    pub fn toggle(&mut self, seat: &Seat) -> bool {
        if seat.is_booked() {
            return false;
        }
        if let Some(pos) = self.ids.iter().position(|&id| id == seat.seat_id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(seat.seat_id);
        }
        true
    }

    pub fn contains(&self, seat_id: i64) -> bool {
        self.ids.contains(&seat_id)
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drops ids that are no longer FREE in `seats`, preserving order.
    /// Used after a failed booking refreshes the map underneath an
    /// existing selection.
    pub fn retain_free(&mut self, seats: &[Seat]) {
        self.ids
            .retain(|&id| seats.iter().any(|s| s.seat_id == id && !s.is_booked()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeatStatus;
    use proptest::prelude::*;

    fn seat(id: i64, row: &str, num: u32, status: SeatStatus) -> Seat {
        Seat {
            seat_id: id,
            row_label: row.to_string(),
            seat_number: num,
            status,
        }
    }

    #[test]
    fn groups_rows_sorted_by_label_and_number() {
        let seats = vec![
            seat(3, "B", 1, SeatStatus::Free),
            seat(2, "A", 2, SeatStatus::Booked),
            seat(1, "A", 1, SeatStatus::Free),
        ];
        let rows = seat_rows(&seats);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "A");
        assert_eq!(
            rows[0].seats.iter().map(|s| s.seat_id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(rows[1].label, "B");
        assert_eq!(rows[1].seats[0].seat_id, 3);
    }

    #[test]
    fn booked_seat_is_never_selectable() {
        let booked = seat(2, "A", 2, SeatStatus::Booked);
        let mut selection = Selection::new();
        assert!(!selection.toggle(&booked));
        assert!(selection.is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let free = seat(1, "A", 1, SeatStatus::Free);
        let mut selection = Selection::new();
        assert!(selection.toggle(&free));
        assert!(selection.contains(1));
        assert!(selection.toggle(&free));
        assert!(selection.is_empty());
    }

    #[test]
    fn retain_free_drops_newly_booked_ids() {
        let mut selection = Selection::new();
        selection.toggle(&seat(1, "A", 1, SeatStatus::Free));
        selection.toggle(&seat(3, "B", 1, SeatStatus::Free));
        // seat 1 got booked by someone else; seat 3 is still free
        let fresh = vec![
            seat(1, "A", 1, SeatStatus::Booked),
            seat(3, "B", 1, SeatStatus::Free),
        ];
        selection.retain_free(&fresh);
        assert_eq!(selection.ids(), &[3]);
    }

    fn arb_seat() -> impl Strategy<Value = Seat> {
        (
            0i64..200,
            prop::sample::select(vec!["A", "B", "C", "D", "AA"]),
            1u32..30,
            prop::bool::ANY,
        )
            .prop_map(|(id, row, num, booked)| {
                seat(
                    id,
                    row,
                    num,
                    if booked {
                        SeatStatus::Booked
                    } else {
                        SeatStatus::Free
                    },
                )
            })
    }

    proptest! {
        #[test]
        fn grouping_is_deterministic(seats in prop::collection::vec(arb_seat(), 0..60)) {
            prop_assert_eq!(seat_rows(&seats), seat_rows(&seats));
        }

        #[test]
        fn rows_and_seats_come_out_ordered(seats in prop::collection::vec(arb_seat(), 0..60)) {
            let rows = seat_rows(&seats);
            for pair in rows.windows(2) {
                prop_assert!(pair[0].label < pair[1].label);
            }
            for row in &rows {
                for pair in row.seats.windows(2) {
                    prop_assert!(pair[0].seat_number <= pair[1].seat_number);
                }
            }
        }

        // Double-toggle restores the selection's contents; membership
        // is what matters, the id may re-enter at a different position.
        #[test]
        fn double_toggle_restores_selection(mut seats in prop::collection::vec(arb_seat(), 1..40)) {
            seats.sort_by_key(|s| s.seat_id);
            seats.dedup_by_key(|s| s.seat_id);
            let mut selection = Selection::new();
            for seat in seats.iter().step_by(2) {
                selection.toggle(seat);
            }
            let mut before = selection.ids().to_vec();
            before.sort_unstable();
            let target = &seats[0];
            selection.toggle(target);
            selection.toggle(target);
            let mut after = selection.ids().to_vec();
            after.sort_unstable();
            prop_assert_eq!(after, before);
        }

        #[test]
        fn booked_seats_never_enter_selection(mut seats in prop::collection::vec(arb_seat(), 0..60)) {
            seats.sort_by_key(|s| s.seat_id);
            seats.dedup_by_key(|s| s.seat_id);
            let mut selection = Selection::new();
            for seat in &seats {
                selection.toggle(seat);
            }
            for &id in selection.ids() {
                let seat = seats.iter().find(|s| s.seat_id == id).unwrap();
                prop_assert!(!seat.is_booked());
            }
        }
    }
}
