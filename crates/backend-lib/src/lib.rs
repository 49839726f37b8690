// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend functionality for the forum server: storage, auth,
//! the authorization gate, and the HTTP surface.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod storage;

use crate::auth::TokenSigner;
use crate::config::Settings;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Storage backend
    pub storage: S,
    /// Token signer/verifier
    pub tokens: Arc<TokenSigner>,
    /// Settings manager
    pub settings: Arc<Settings>,
}

impl<S> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: Settings) -> Self {
        let tokens = Arc::new(TokenSigner::new(settings.token_secret.as_bytes()));
        Self {
            storage,
            tokens,
            settings: Arc::new(settings),
        }
    }
}
