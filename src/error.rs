use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::users::repo::StoreError;

/// Failure taxonomy for the auth surface. Doubles as the extractor
/// rejection type, so middleware failures and handler failures render
/// through the same mapping.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication token missing")]
    MissingToken,
    #[error("invalid or revoked session token")]
    InvalidToken,
    #[error("insufficient privileges")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("credential store failure")]
    Store(#[source] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            // Callers that care about duplicates match on StoreError before
            // converting; a leak here is a plain server fault.
            StoreError::DuplicateEmail => {
                AuthError::Store(anyhow::anyhow!("unhandled duplicate email"))
            }
            StoreError::Backend(e) => AuthError::Store(e),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Clients probe this body shape, keep it stable.
            AuthError::MissingToken | AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "isAuth": false, "error": true })),
            )
                .into_response(),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "success": false, "message": "admin access required" })),
            )
                .into_response(),
            AuthError::UserNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": "user not found" })),
            )
                .into_response(),
            AuthError::Store(e) => {
                tracing::error!(error = %e, "credential store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}
