// ============================
// crates/backend-lib/src/handlers/auth.rs
// ============================
//! Registration and login.
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::{hash_password_secure, verify_password};
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;
use forum_common::{Identity, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// `POST /auth/register`
///
/// Persists a new identity with a salted hash. The username uniqueness
/// check happens inside the store as a single atomic step.
pub async fn register<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let username = body.username.unwrap_or_default();
    let mut password = body.password.unwrap_or_default();

    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let password_hash =
        hash_password_secure(&mut password).map_err(|e| AppError::Internal(e.to_string()))?;

    let identity = Identity {
        user_id: Uuid::new_v4().to_string(),
        username,
        password_hash,
    };
    state.storage.create_identity(&identity).await?;

    tracing::info!(username = %identity.username, "registered new identity");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            user_id: identity.user_id,
            username: identity.username,
        }),
    ))
}

/// `POST /auth/login`
///
/// Unknown username and wrong password produce the same failure, so the
/// endpoint cannot be used to enumerate usernames.
pub async fn login<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    let Some(identity) = state.storage.find_identity(&username).await? else {
        return Err(AppError::AuthFailed);
    };
    if !verify_password(&identity.password_hash, &password) {
        return Err(AppError::AuthFailed);
    }

    let token = state
        .tokens
        .issue(&identity.user_id, &identity.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user_id: identity.user_id,
        username: identity.username,
    }))
}
