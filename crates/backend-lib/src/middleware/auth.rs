// ============================
// crates/backend-lib/src/middleware/auth.rs
// ============================
//! Bearer-token authorization gate.
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// Verified identity attached to the request by the gate.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub user_id: String,
    pub username: String,
}

/// Authorization gate middleware.
///
/// A request without an `Authorization` header passes through with no
/// identity attached (the legacy anonymous posting path). A header that
/// carries no usable bearer token is rejected outright, and a token
/// failing signature or expiry checks is rejected with a distinct
/// status. On success the decoded identity lands in request extensions.
pub async fn authenticate<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return Ok(next.run(request).await);
    };

    // header shape is "Bearer <token>"
    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.split_whitespace().nth(1))
        .ok_or(AppError::Unauthenticated)?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| AppError::InvalidToken)?;

    request.extensions_mut().insert(AuthIdentity {
        user_id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}
