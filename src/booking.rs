//! Seat-selection and booking workflow: load the seat map, toggle
//! seats, submit, hand off to the confirmation view.

use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};
use crate::models::Seat;
use crate::seatmap::{seat_rows, SeatRow, Selection};

#[derive(Debug, Error)]
pub enum BookingError {
    /// Local validation; the server is never contacted for this.
    #[error("select at least one seat")]
    EmptySelection,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Summary state handed from the showtime list into the seat page.
/// Purely cosmetic; booking works with all fields absent.
#[derive(Debug, Clone, Default)]
pub struct ShowtimeContext {
    pub movie_title: Option<String>,
    pub cinema_name: Option<String>,
    pub screen_number: Option<u32>,
}

/// What the confirmation view renders. Transient hand-off state only,
/// lost when the process exits.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub movie_title: Option<String>,
    pub seat_count: usize,
}

/// State machine for one showtime's booking session.
pub struct BookingFlow {
    showtime_id: i64,
    context: ShowtimeContext,
    seats: Vec<Seat>,
    selection: Selection,
}

impl BookingFlow {
    pub fn new(showtime_id: i64, context: ShowtimeContext) -> Self {
        Self {
            showtime_id,
            context,
            seats: Vec::new(),
            selection: Selection::new(),
        }
    }

    pub fn showtime_id(&self) -> i64 {
        self.showtime_id
    }

    pub fn context(&self) -> &ShowtimeContext {
        &self.context
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Grouped chart layout, re-derived from the current seat map.
    pub fn rows(&self) -> Vec<SeatRow> {
        seat_rows(&self.seats)
    }

    /// Fetches the seat map, replacing local seat state and clearing
    /// any prior selection. On failure the map is left empty; there is
    /// no automatic retry.
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        match client.fetch_seat_map(self.showtime_id).await {
            Ok(seats) => {
                info!(showtime_id = self.showtime_id, seats = seats.len(), "seat map loaded");
                self.seats = seats;
                self.selection.clear();
                Ok(())
            }
            Err(e) => {
                self.seats.clear();
                self.selection.clear();
                Err(e)
            }
        }
    }

    /// Toggles the seat with `seat_id`. Unknown ids and booked seats
    /// are no-ops; returns whether the selection changed.
    pub fn toggle(&mut self, seat_id: i64) -> bool {
        let Some(seat) = self.seats.iter().find(|s| s.seat_id == seat_id) else {
            return false;
        };
        self.selection.toggle(seat)
    }

    /// Submits the current selection.
    ///
    /// An empty selection fails locally without a network call. On
    /// success (the backend answers 204) the selection is cleared and a
    /// [`Confirmation`] is returned for the hand-off. On failure the
    /// server's message comes back verbatim, and the seat map is
    /// re-fetched immediately so a retry never runs against a stale
    /// map; the selection keeps whichever seats are still free.
    pub async fn submit(&mut self, client: &ApiClient) -> Result<Confirmation, BookingError> {
        if self.selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }

        match client.book_seats(self.showtime_id, self.selection.ids()).await {
            Ok(()) => {
                let confirmation = Confirmation {
                    movie_title: self.context.movie_title.clone(),
                    seat_count: self.selection.len(),
                };
                self.selection.clear();
                Ok(confirmation)
            }
            Err(e) => {
                warn!(showtime_id = self.showtime_id, error = %e, "booking failed, refreshing seat map");
                match client.fetch_seat_map(self.showtime_id).await {
                    Ok(fresh) => {
                        self.seats = fresh;
                        self.selection.retain_free(&self.seats);
                    }
                    Err(refresh_err) => {
                        // keep the stale map rather than blanking the page
                        warn!(error = %refresh_err, "seat map refresh after failed booking also failed");
                    }
                }
                Err(BookingError::Api(e))
            }
        }
    }
}
