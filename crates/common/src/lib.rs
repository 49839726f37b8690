// ================
// common/src/lib.rs
// ================
//! Wire-level types shared between the forum server and its clients.
//! Field names follow the JSON surface (camelCase), so these structs
//! round-trip exactly what goes over HTTP.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single board message, scoped to a room.
///
/// `message_id` is the sole external handle for fetch/edit/delete.
/// `user_id` is `"anonymous"` when the message was posted without a
/// verified identity. `last_edited_at` is absent until the first edit
/// and omitted from JSON while absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,
    pub author: String,
    pub message: String,
    pub room: String,
    pub user_id: String,
    pub edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// A registered identity as persisted by the server.
///
/// `password_hash` is a salted one-way hash (PHC string); the raw
/// password is never stored. Identities are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
}

/// Body of `POST /messages`.
///
/// All fields are optional at the wire level; the server validates
/// presence. On the authenticated path `author` and `user_id` are
/// ignored and forced from the verified token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of `PUT /messages/{id}`. `user_id` is the caller's claimed
/// identity, compared exact-match against the stored owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of `DELETE /messages/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Confirmation returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageResponse {
    pub success: bool,
    pub message_id: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Returned by a successful registration. Never carries the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: String,
    pub username: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Returned by a successful login: a signed bearer token plus the
/// public identity fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user_id: String,
    pub username: String,
}
