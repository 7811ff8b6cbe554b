use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

pub const UNEXPECTED_MESSAGE: &str = "Something went wrong, sorry";

/// Failures of the credential and session handlers.
///
/// Everything except [`AuthError::Internal`] is answered with a fixed
/// `{"message": ...}` body. `Internal` is the catch-all used by the update
/// and delete routes and always renders as an opaque 500.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidRequest(&'static str),

    #[error("User with that name not found or password incorrect")]
    AuthenticationFailed,

    #[error("There is an existing account with this name")]
    DuplicateAccount,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("User not found")]
    NotFound,

    #[error("unexpected failure: {0}")]
    Unexpected(anyhow::Error),

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidRequest(_)
            | AuthError::AuthenticationFailed
            | AuthError::DuplicateAccount
            | AuthError::Unexpected(_) => StatusCode::BAD_REQUEST,
            AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing text; failure detail stays in the logs.
    fn message(&self) -> String {
        match self {
            AuthError::Unexpected(e) => {
                error!(error = ?e, "unexpected failure");
                UNEXPECTED_MESSAGE.to_string()
            }
            AuthError::Internal(e) => {
                error!(error = ?e, "unhandled failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = MessageBody {
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
