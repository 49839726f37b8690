// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router assembly.
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, messages};
use crate::middleware::authenticate;
use crate::storage::Storage;
use crate::AppState;

/// Create the HTTP router.
///
/// The authorization gate is layered onto `POST /messages` only: that
/// is the one route with an authenticated variant. Edit and delete
/// authorize on the body-supplied `userId` in the handler.
pub fn create_router<S: Storage + Send + Sync + Clone + 'static>(
    state: Arc<AppState<S>>,
) -> Router {
    let gate = axum::middleware::from_fn_with_state(state.clone(), authenticate);

    Router::new()
        .route("/", get(index))
        .route(
            "/messages",
            get(messages::list_messages).merge(post(messages::create_message).layer(gate)),
        )
        .route(
            "/messages/{message_id}",
            get(messages::get_message)
                .put(messages::edit_message)
                .delete(messages::delete_message),
        )
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Default route
async fn index() -> &'static str {
    "Hello from the forum server!"
}
