//! Client for the cinema ticketing REST API.
//!
//! The backend owns all the hard parts (routing, seat transaction
//! semantics, conflict detection, storage); this crate is the booking
//! front end: a typed HTTP client, the seat-selection workflow, and
//! the cinema/showtime list pages as plain state machines that a CLI
//! or any other shell can drive.

pub mod api;
pub mod booking;
pub mod config;
pub mod models;
pub mod pages;
pub mod seatmap;
pub mod validate;
