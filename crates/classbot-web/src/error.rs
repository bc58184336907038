//! Handler-level errors and their HTTP rendering.
//!
//! Every failure becomes a short plain-text message; details stay in the
//! log.  A failed request never takes the server down.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use classbot_store::StoreError;
use thiserror::Error;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum WebError {
    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::Store(StoreError::UsernameTaken(_)) => (
                StatusCode::CONFLICT,
                "Username already taken, please choose another.",
            ),
            WebError::Store(StoreError::InvalidArgument(_)) => (
                StatusCode::BAD_REQUEST,
                "Please fill in every field and try again.",
            ),
            WebError::Store(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong while saving, please try again.",
                )
            }
        };
        (status, message).into_response()
    }
}
