use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{errors::AuthError, jwt::JwtKeys, repo_types::User};
use crate::state::AppState;

/// Authenticated caller: the bearer token is verified and its user re-read
/// from the store, so tokens of deleted users are refused.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Expect "Bearer <token>"
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|auth| {
                auth.strip_prefix("Bearer ")
                    .or_else(|| auth.strip_prefix("bearer "))
            })
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthenticated(
                "Please supply some valid credentials",
            ))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AuthError::Unauthenticated("Invalid or expired token")
        })?;

        match state.users.find_by_id(claims.user_id).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => {
                warn!(user_id = claims.user_id, "token for unknown user");
                Err(AuthError::Unauthenticated("User not found"))
            }
            Err(e) => Err(AuthError::Internal(e.into())),
        }
    }
}
