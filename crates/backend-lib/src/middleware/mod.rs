// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the forum server.

pub mod auth;

pub use auth::{authenticate, AuthIdentity};
