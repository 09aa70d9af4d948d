//! The browser pages of the original front end, reworked as plain
//! state machines: each page owns its in-memory cache of server state,
//! reconciles it optimistically on mutation, and ties its list load to
//! a cancellation token scoped to the page's lifetime.

pub mod cinemas;
pub mod showtimes;

use thiserror::Error;
use validator::ValidationErrors;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum PageError {
    /// Local form validation failed; nothing was sent to the server.
    #[error("validation failed")]
    Invalid(#[from] ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PageError {
    /// Per-field messages for inline display next to the offending
    /// inputs.
    pub fn field_messages(&self) -> Vec<(String, String)> {
        match self {
            PageError::Invalid(errors) => errors
                .field_errors()
                .iter()
                .flat_map(|(field, errs)| {
                    errs.iter().map(|e| {
                        let message = e
                            .message
                            .as_deref()
                            .unwrap_or_else(|| e.code.as_ref())
                            .to_string();
                        (field.to_string(), message)
                    })
                })
                .collect(),
            PageError::Api(_) => Vec::new(),
        }
    }
}
