use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::models::{Cinema, CinemaDto, CinemaPayload};

use super::{cancellable, ApiClient, ApiError};

impl ApiClient {
    /// GET /api/cinemas
    ///
    /// List loads are cancellable because they are tied to a page's
    /// visible lifetime; navigating away drops the request.
    pub async fn list_cinemas(&self, cancel: &CancellationToken) -> Result<Vec<Cinema>, ApiError> {
        cancellable(cancel, async {
            let res = self.http().get(self.url("/api/cinemas")).send().await?;
            let res = Self::ensure_success(res).await?;
            let dtos: Vec<CinemaDto> = Self::json_body(res).await?.unwrap_or_default();
            Ok(dtos.into_iter().map(CinemaDto::normalize).collect())
        })
        .await
    }

    /// POST /api/cinemas
    pub async fn create_cinema(&self, payload: &CinemaPayload) -> Result<Cinema, ApiError> {
        let res = self
            .http()
            .post(self.url("/api/cinemas"))
            .json(payload)
            .send()
            .await?;
        let res = Self::ensure_success(res).await?;
        let created = Self::required_json::<CinemaDto>(res).await?.normalize();
        info!(cinema_id = created.id, name = %created.name, "cinema created");
        Ok(created)
    }

    /// PUT /api/cinemas/{id}
    ///
    /// The API requires the complete resource representation and
    /// usually answers 204; any body on success is ignored, so the
    /// caller's submitted payload is the new truth.
    pub async fn update_cinema(&self, id: i64, payload: &CinemaPayload) -> Result<(), ApiError> {
        let res = self
            .http()
            .put(self.url(&format!("/api/cinemas/{id}")))
            .json(payload)
            .send()
            .await?;
        Self::ensure_success(res).await?;
        info!(cinema_id = id, "cinema updated");
        Ok(())
    }

    /// DELETE /api/cinemas/{id}
    pub async fn delete_cinema(&self, id: i64) -> Result<(), ApiError> {
        let res = self
            .http()
            .delete(self.url(&format!("/api/cinemas/{id}")))
            .send()
            .await?;
        Self::ensure_success(res).await?;
        info!(cinema_id = id, "cinema deleted");
        Ok(())
    }
}
