use tokio_util::sync::CancellationToken;
use tracing::debug;
use validator::Validate;

use crate::api::{ApiClient, ApiError};
use crate::models::{Cinema, CinemaPayload};
use crate::validate;

use super::PageError;

/// Create/edit form for a cinema. Validation mirrors the backend rules
/// client-side so bad input never reaches the network.
#[derive(Debug, Clone, Validate)]
pub struct CinemaForm {
    #[validate(custom(function = validate::required_name))]
    pub name: String,
    #[validate(custom(function = validate::optional_email))]
    pub email: String,
    #[validate(custom(function = validate::optional_phone))]
    pub phone: String,
    pub address: String,
    pub city: String,
    #[validate(custom(function = validate::optional_postcode))]
    pub postcode: String,
    pub country: String,
    pub state_or_province: Option<String>,
    pub total_screens: u32,
}

impl Default for CinemaForm {
    fn default() -> Self {
        // country and screen count are required by the backend but not
        // part of the visible form, so they get the historical defaults
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            postcode: String::new(),
            country: "UK".to_string(),
            state_or_province: None,
            total_screens: 1,
        }
    }
}

impl CinemaForm {
    /// Pre-fills the edit form from the current entity.
    pub fn from_cinema(cinema: &Cinema) -> Self {
        Self {
            name: cinema.name.clone(),
            email: cinema.email.clone(),
            phone: cinema.phone.clone(),
            address: cinema.address.clone(),
            city: cinema.city.clone(),
            postcode: cinema.postcode.clone(),
            country: cinema.country.clone(),
            state_or_province: cinema.state_or_province.clone(),
            total_screens: cinema.total_screens.max(1),
        }
    }

    fn payload(&self) -> CinemaPayload {
        CinemaPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: validate::norm_phone(&self.phone),
            address_line: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            postcode: validate::norm_postcode(&self.postcode),
            country: self.country.clone(),
            state_or_province: self.state_or_province.clone(),
            total_screens: self.total_screens,
        }
    }
}

/// Cinema list page: cached mirror of `GET /api/cinemas`, reconciled
/// optimistically on create/update/delete.
pub struct CinemaList {
    items: Vec<Cinema>,
    notice: Option<String>,
    cancel: CancellationToken,
}

impl Default for CinemaList {
    fn default() -> Self {
        Self::new()
    }
}

impl CinemaList {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            notice: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn items(&self) -> &[Cinema] {
        &self.items
    }

    /// Transient confirmation message, consumed by the caller.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Cancels any in-flight list load; called on navigation away.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Loads the collection. A load cancelled via [`Self::close`] is
    /// ignored silently, never surfaced as an error.
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), ApiError> {
        match client.list_cinemas(&self.cancel).await {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) if e.is_cancelled() => {
                debug!("cinema list load cancelled, ignoring");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Client-side substring filter over all cached text fields.
    pub fn filter(&self, q: &str) -> Vec<&Cinema> {
        let term = q.trim().to_lowercase();
        if term.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|c| {
                [
                    &c.name, &c.address, &c.city, &c.postcode, &c.email, &c.phone,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
            })
            .collect()
    }

    /// Validates the form, creates the cinema and prepends it to the
    /// cached list.
    pub async fn create(&mut self, client: &ApiClient, form: &CinemaForm) -> Result<(), PageError> {
        form.validate()?;
        let created = client.create_cinema(&form.payload()).await?;
        self.notice = Some(format!("Cinema \"{}\" created", created.name));
        self.items.insert(0, created);
        Ok(())
    }

    /// Optimistically removes the row, then calls the delete endpoint;
    /// on failure the pre-delete snapshot is restored. The caller is
    /// responsible for asking the user to confirm first.
    pub async fn delete(&mut self, client: &ApiClient, id: i64) -> Result<(), ApiError> {
        let snapshot = self.items.clone();
        self.items.retain(|c| c.id != id);
        if let Err(e) = client.delete_cinema(id).await {
            self.items = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// Full-entity update. The API answers 204, so on success the
    /// submitted payload becomes the new local state as-is.
    pub async fn update(
        &mut self,
        client: &ApiClient,
        id: i64,
        form: &CinemaForm,
    ) -> Result<(), PageError> {
        form.validate()?;
        let payload = form.payload();
        client.update_cinema(id, &payload).await?;
        let updated = payload.into_cinema(id);
        self.notice = Some(format!("Cinema \"{}\" updated", updated.name));
        if let Some(slot) = self.items.iter_mut().find(|c| c.id == id) {
            *slot = updated;
        }
        Ok(())
    }
}
