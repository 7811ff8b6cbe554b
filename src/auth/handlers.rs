use axum::{
    body::Bytes,
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, CredentialsRequest, ProgressRequest, PublicUser},
        errors::AuthError,
        extractors::AuthUser,
        jwt::JwtKeys,
        repo::StoreError,
        repo_types::{ProgressUpdate, User},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub fn progress_routes() -> Router<AppState> {
    Router::new().route("/:id", patch(update_progress).delete(delete_user))
}

fn issue_response(state: &AppState, user: User) -> Result<AuthResponse, AuthError> {
    let token = JwtKeys::from_ref(state)
        .issue(user.id)
        .map_err(AuthError::Unexpected)?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<Json<AuthResponse>, AuthError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let (name, password) = payload.non_empty().ok_or(AuthError::InvalidRequest(
        "Please provide both name and password",
    ))?;

    let user = match state.users.find_by_name(name).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(%name, "login unknown name");
            state.passwords.verify_unknown(password);
            return Err(AuthError::AuthenticationFailed);
        }
        Err(e) => return Err(AuthError::Unexpected(e.into())),
    };

    let ok = state
        .passwords
        .verify(password, &user.password_hash)
        .map_err(AuthError::Unexpected)?;
    if !ok {
        warn!(%name, user_id = user.id, "login invalid password");
        return Err(AuthError::AuthenticationFailed);
    }

    info!(user_id = user.id, %name, "user logged in");
    Ok(Json(issue_response(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Option<Json<CredentialsRequest>>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let (name, password) = payload.non_empty().ok_or(AuthError::InvalidRequest(
        "Please provide password and a name",
    ))?;

    let hash = state
        .passwords
        .hash(password)
        .map_err(AuthError::Unexpected)?;

    let user = match state.users.create(name, &hash).await {
        Ok(u) => u,
        Err(StoreError::UniqueViolation) => {
            warn!(%name, "name already registered");
            return Err(AuthError::DuplicateAccount);
        }
        Err(e) => return Err(AuthError::Unexpected(e.into())),
    };

    info!(user_id = user.id, %name, "user registered");
    Ok((StatusCode::CREATED, Json(issue_response(&state, user)?)))
}

/// Token check and profile lookup in one call.
#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}

/// Partial update of `checkPoint` / `highScore`. Unauthenticated, and the
/// updated record is returned as stored, hash included.
#[instrument(skip(state, body))]
pub async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<Json<User>, AuthError> {
    // An absent body is an empty update.
    let update: ProgressUpdate = if body.iter().all(u8::is_ascii_whitespace) {
        ProgressUpdate::default()
    } else {
        match Json::<ProgressRequest>::from_bytes(&body) {
            Ok(Json(p)) => p.into(),
            Err(e) => {
                warn!(error = %e, "rejected progress payload");
                return Err(AuthError::InvalidRequest("Invalid progress payload"));
            }
        }
    };

    match state.users.find_by_id(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!(user_id = id, "progress update for unknown user");
            return Err(AuthError::NotFound);
        }
        Err(e) => return Err(AuthError::Internal(e.into())),
    }

    let updated = state.users.update_progress(id, update).await.map_err(|e| {
        error!(error = %e, user_id = id, "update_progress failed");
        AuthError::Internal(e.into())
    })?;

    info!(
        user_id = id,
        check_point = updated.check_point,
        high_score = updated.high_score,
        "progress updated"
    );
    Ok(Json(updated))
}

/// Any authenticated caller may delete any account.
#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i32>,
) -> Result<&'static str, AuthError> {
    if caller.id != id {
        warn!(caller_id = caller.id, user_id = id, "deleting another user's account");
    }

    let target = state
        .users
        .find_by_id(id)
        .await
        .map_err(|e| AuthError::Internal(e.into()))?
        .ok_or_else(|| AuthError::Internal(anyhow::anyhow!("user {id} does not exist")))?;

    state.users.delete(target.id).await.map_err(|e| {
        error!(error = %e, user_id = id, "delete failed");
        AuthError::Internal(e.into())
    })?;

    info!(user_id = id, caller_id = caller.id, "user deleted");
    Ok("User terminated")
}
