use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::api::showtimes::ShowtimeQuery;
use crate::api::{ApiClient, ApiError};
use crate::models::{NewShowtime, Showtime, SimpleShowtime};
use crate::validate;

use super::PageError;

/// Creation form for the canonical `POST /api/showtimes` endpoint.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = times_in_order))]
pub struct ShowtimeForm {
    #[validate(custom(function = validate::required_movie_title))]
    pub movie_title: String,
    #[validate(range(min = 1, message = "Screen number must be positive"))]
    pub screen_number: u32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(range(min = 0.0, message = "Ticket price cannot be negative"))]
    pub ticket_price: f64,
    pub language: Option<String>,
    pub format: Option<String>,
    #[validate(range(min = 1, message = "Cinema id must be positive"))]
    pub cinema_id: i64,
}

fn times_in_order(form: &ShowtimeForm) -> Result<(), ValidationError> {
    if form.end_time <= form.start_time {
        let mut err = ValidationError::new("times");
        err.message = Some("End time must be after start time".into());
        return Err(err);
    }
    Ok(())
}

impl ShowtimeForm {
    fn payload(&self) -> NewShowtime {
        NewShowtime {
            movie_title: self.movie_title.trim().to_string(),
            screen_number: self.screen_number,
            start_time: self.start_time,
            end_time: self.end_time,
            ticket_price: self.ticket_price,
            language: self.language.clone().filter(|s| !s.trim().is_empty()),
            format: self.format.clone().filter(|s| !s.trim().is_empty()),
            cinema_id: self.cinema_id,
        }
    }
}

/// Form for the name-based `POST /api/showtimes/simple` variant.
#[derive(Debug, Clone, Validate)]
pub struct SimpleShowtimeForm {
    #[validate(custom(function = validate::required_movie_title))]
    pub movie_title: String,
    #[validate(custom(function = validate::required_cinema_name))]
    pub cinema_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl SimpleShowtimeForm {
    fn payload(&self) -> SimpleShowtime {
        SimpleShowtime {
            movie_title: self.movie_title.trim().to_string(),
            cinema_name: self.cinema_name.trim().to_string(),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

/// Showtime list page. The cached rows can come from the plain list or
/// from any of the server-side query endpoints; mutations reconcile
/// them optimistically just like the cinema page.
pub struct ShowtimeList {
    rows: Vec<Showtime>,
    notice: Option<String>,
    cancel: CancellationToken,
}

impl Default for ShowtimeList {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowtimeList {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            notice: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn rows(&self) -> &[Showtime] {
        &self.rows
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub async fn load(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        match client.list_showtimes(&self.cancel).await {
            Ok(rows) => {
                self.rows = rows;
                Ok(())
            }
            Err(e) if e.is_cancelled() => {
                debug!("showtime list load cancelled, ignoring");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Server-side title substring search.
    pub async fn search(&mut self, client: &ApiClient, q: &str) -> Result<(), ApiError> {
        self.rows = client.search_showtimes(q).await?;
        Ok(())
    }

    /// Server-side time-window query for one cinema.
    pub async fn window(
        &mut self,
        client: &ApiClient,
        cinema_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<(), ApiError> {
        self.rows = client.showtimes_window(cinema_id, from, to).await?;
        Ok(())
    }

    /// Combined free-text/cinema/time-range filter.
    pub async fn apply_filter(
        &mut self,
        client: &ApiClient,
        query: &ShowtimeQuery,
    ) -> Result<(), ApiError> {
        self.rows = client.filter_showtimes(query).await?;
        Ok(())
    }

    pub async fn by_cinema(&mut self, client: &ApiClient, cinema_id: i64) -> Result<(), ApiError> {
        self.rows = client.showtimes_by_cinema(cinema_id).await?;
        Ok(())
    }

    /// Client-side substring filter over the cached rows.
    pub fn filter_local(&self, q: &str) -> Vec<&Showtime> {
        let term = q.trim().to_lowercase();
        if term.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|s| {
                s.movie_title.to_lowercase().contains(&term)
                    || s.cinema_name
                        .as_deref()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
                    || s.language
                        .as_deref()
                        .is_some_and(|l| l.to_lowercase().contains(&term))
                    || s.format
                        .as_deref()
                        .is_some_and(|f| f.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub async fn create(
        &mut self,
        client: &ApiClient,
        form: &ShowtimeForm,
    ) -> Result<(), PageError> {
        form.validate()?;
        let created = client.create_showtime(&form.payload()).await?;
        self.notice = Some(format!("Showtime \"{}\" created", created.movie_title));
        self.rows.insert(0, created);
        Ok(())
    }

    pub async fn create_simple(
        &mut self,
        client: &ApiClient,
        form: &SimpleShowtimeForm,
    ) -> Result<(), PageError> {
        form.validate()?;
        let created = client.create_showtime_simple(&form.payload()).await?;
        self.notice = Some(format!("Showtime \"{}\" created", created.movie_title));
        self.rows.insert(0, created);
        Ok(())
    }

    /// Optimistic delete with snapshot rollback, same contract as the
    /// cinema page.
    pub async fn delete(&mut self, client: &ApiClient, id: i64) -> Result<(), ApiError> {
        let snapshot = self.rows.clone();
        self.rows.retain(|s| s.id != id);
        if let Err(e) = client.delete_showtime(id).await {
            self.rows = snapshot;
            return Err(e);
        }
        Ok(())
    }
}
