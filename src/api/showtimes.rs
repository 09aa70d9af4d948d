use chrono::NaiveDateTime;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::models::{NewShowtime, Seat, Showtime, SimpleShowtime};

use super::{cancellable, ApiClient, ApiError};

/// Parameters for `GET /api/showtimes/filter`. All parts are optional
/// and combined server-side; `from`/`to` are ISO local datetimes.
#[derive(Debug, Clone, Default)]
pub struct ShowtimeQuery {
    pub q: Option<String>,
    pub cinema_id: Option<i64>,
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl ShowtimeQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = &self.q {
            params.push(("q", q.clone()));
        }
        if let Some(id) = self.cinema_id {
            params.push(("cinemaId", id.to_string()));
        }
        if let Some(from) = self.from {
            params.push(("from", iso_local(from)));
        }
        if let Some(to) = self.to {
            params.push(("to", iso_local(to)));
        }
        params
    }
}

fn iso_local(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Body for `POST /api/showtimes/{id}/tickets`.
#[derive(Debug, serde::Serialize)]
struct BookSeatsRequest<'a> {
    #[serde(rename = "seatIds")]
    seat_ids: &'a [i64],
}

impl ApiClient {
    /// GET /api/showtimes
    pub async fn list_showtimes(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Showtime>, ApiError> {
        cancellable(cancel, async {
            let res = self.http().get(self.url("/api/showtimes")).send().await?;
            let res = Self::ensure_success(res).await?;
            Ok(Self::json_body(res).await?.unwrap_or_default())
        })
        .await
    }

    /// GET /api/showtimes/search?q= — title substring search.
    pub async fn search_showtimes(&self, q: &str) -> Result<Vec<Showtime>, ApiError> {
        let res = self
            .http()
            .get(self.url("/api/showtimes/search"))
            .query(&[("q", q)])
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        Ok(Self::json_body(res).await?.unwrap_or_default())
    }

    /// GET /api/showtimes/window?cinemaId=&from=&to=
    pub async fn showtimes_window(
        &self,
        cinema_id: i64,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Showtime>, ApiError> {
        let res = self
            .http()
            .get(self.url("/api/showtimes/window"))
            .query(&[
                ("cinemaId", cinema_id.to_string()),
                ("from", iso_local(from)),
                ("to", iso_local(to)),
            ])
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        Ok(Self::json_body(res).await?.unwrap_or_default())
    }

    /// GET /api/showtimes/filter?q=&cinemaId=&from=&to=
    pub async fn filter_showtimes(&self, query: &ShowtimeQuery) -> Result<Vec<Showtime>, ApiError> {
        let res = self
            .http()
            .get(self.url("/api/showtimes/filter"))
            .query(&query.params())
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        Ok(Self::json_body(res).await?.unwrap_or_default())
    }

    /// GET /api/showtimes/by-cinema/{id}
    pub async fn showtimes_by_cinema(&self, cinema_id: i64) -> Result<Vec<Showtime>, ApiError> {
        let res = self
            .http()
            .get(self.url(&format!("/api/showtimes/by-cinema/{cinema_id}")))
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        Ok(Self::json_body(res).await?.unwrap_or_default())
    }

    /// POST /api/showtimes — canonical creation endpoint.
    pub async fn create_showtime(&self, payload: &NewShowtime) -> Result<Showtime, ApiError> {
        let res = self
            .http()
            .post(self.url("/api/showtimes"))
            .json(payload)
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        let created: Showtime = Self::required_json(res).await?;
        info!(showtime_id = created.id, movie = %created.movie_title, "showtime created");
        Ok(created)
    }

    /// POST /api/showtimes/simple — name-based variant kept for the
    /// pages that resolve the cinema by display name.
    pub async fn create_showtime_simple(
        &self,
        payload: &SimpleShowtime,
    ) -> Result<Showtime, ApiError> {
        let res = self
            .http()
            .post(self.url("/api/showtimes/simple"))
            .json(payload)
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        let created: Showtime = Self::required_json(res).await?;
        info!(showtime_id = created.id, movie = %created.movie_title, "showtime created (simple)");
        Ok(created)
    }

    /// DELETE /api/showtimes/{id}
    pub async fn delete_showtime(&self, id: i64) -> Result<(), ApiError> {
        let res = self
            .http()
            .delete(self.url(&format!("/api/showtimes/{id}")))
            .send()
            .await?;
        Self::ensure_success(res).await?;
        info!(showtime_id = id, "showtime deleted");
        Ok(())
    }

    /// GET /api/showtimes/{id}/seats — current seat map.
    pub async fn fetch_seat_map(&self, showtime_id: i64) -> Result<Vec<Seat>, ApiError> {
        let res = self
            .http()
            .get(self.url(&format!("/api/showtimes/{showtime_id}/seats")))
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        Ok(Self::json_body(res).await?.unwrap_or_default())
    }

    /// POST /api/showtimes/{id}/tickets — book the given seats.
    /// Success is a 204 with no body; seat-availability races are the
    /// server's to detect and arrive here as an [`ApiError::Api`].
    pub async fn book_seats(&self, showtime_id: i64, seat_ids: &[i64]) -> Result<(), ApiError> {
        let res = self
            .http()
            .post(self.url(&format!("/api/showtimes/{showtime_id}/tickets")))
            .json(&BookSeatsRequest { seat_ids })
            .send()
            .await?;
        Self::ensure_success(res).await?;
        info!(showtime_id, seats = seat_ids.len(), "seats booked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn window_params_use_iso_local_format() {
        let from = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        assert_eq!(iso_local(from), "2026-03-14T18:30:00");
    }

    #[test]
    fn filter_query_skips_absent_parts() {
        let query = ShowtimeQuery {
            q: Some("batman".into()),
            cinema_id: Some(3),
            ..Default::default()
        };
        assert_eq!(
            query.params(),
            vec![("q", "batman".to_string()), ("cinemaId", "3".to_string())]
        );
        assert!(ShowtimeQuery::default().params().is_empty());
    }
}
