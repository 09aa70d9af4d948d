use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Showtime record as listed by the API.
///
/// Depending on the endpoint the cinema reference arrives as an id or
/// as a display name, so both are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub id: i64,
    pub movie_title: String,
    pub screen_number: Option<u32>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ticket_price: f64,
    pub language: Option<String>,
    pub format: Option<String>,
    pub cinema_id: Option<i64>,
    pub cinema_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for `POST /api/showtimes`, the canonical creation endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShowtime {
    pub movie_title: String,
    pub screen_number: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub ticket_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub cinema_id: i64,
}

/// Body for `POST /api/showtimes/simple`, the name-based variant that
/// resolves the cinema server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleShowtime {
    pub movie_title: String,
    pub cinema_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
