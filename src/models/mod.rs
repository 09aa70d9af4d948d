pub mod cinema;
pub mod seat;
pub mod showtime;

pub use cinema::{Cinema, CinemaDto, CinemaPayload};
pub use seat::{Seat, SeatStatus};
pub use showtime::{NewShowtime, Showtime, SimpleShowtime};
