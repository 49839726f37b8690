// crates/backend-lib/src/handlers/mod.rs

//! HTTP route handlers.

pub mod auth;
pub mod messages;
