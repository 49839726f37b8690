// ============================
// crates/backend-lib/src/handlers/messages.rs
// ============================
//! Message operations: list, create, fetch, edit, delete.
//!
//! Ownership checks live here, not in storage. Create trusts the
//! verified token when one was presented; Edit and Delete authorize on
//! the caller-supplied `userId` in the body, which mirrors the board's
//! observed trust model and is deliberately left as-is.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::AuthIdentity;
use crate::storage::{MessageEdit, Storage};
use crate::AppState;
use forum_common::{
    CreateMessageRequest, DeleteMessageRequest, DeleteMessageResponse, EditMessageRequest, Message,
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    room: Option<String>,
}

fn blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// `GET /messages?room=R` — room-scoped history, oldest first.
pub async fn list_messages<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Message>>, AppError> {
    let Some(room) = params.room.filter(|r| !r.trim().is_empty()) else {
        return Err(AppError::Validation("Room ID is required".to_string()));
    };

    let messages = state.storage.list_messages(&room).await?;
    Ok(Json(messages))
}

/// `POST /messages`
///
/// Two shapes coexist. With a verified identity (attached by the gate),
/// `author` and `userId` are forced from the token and any
/// client-supplied values are ignored. Without one, the caller supplies
/// a display name and an unverified pseudo-identity, defaulting to
/// `"anonymous"`.
pub async fn create_message<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    identity: Option<Extension<AuthIdentity>>,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    let (author, user_id) = match identity {
        Some(Extension(identity)) => {
            if blank(body.message.as_deref()) || blank(body.room.as_deref()) {
                return Err(AppError::Validation(
                    "Message and room are required".to_string(),
                ));
            }
            (identity.username, identity.user_id)
        },
        None => {
            if blank(body.author.as_deref())
                || blank(body.message.as_deref())
                || blank(body.room.as_deref())
            {
                return Err(AppError::Validation(
                    "Author, message, and room are required".to_string(),
                ));
            }
            let author = body.author.unwrap_or_default();
            let user_id = body
                .user_id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| "anonymous".to_string());
            (author, user_id)
        },
    };

    let message = Message {
        message_id: Uuid::new_v4().to_string(),
        author,
        message: body.message.unwrap_or_default(),
        room: body.room.unwrap_or_default(),
        user_id,
        edited: false,
        last_edited_at: None,
        timestamp: Utc::now(),
    };

    state.storage.insert_message(&message).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// `GET /messages/{message_id}`
pub async fn get_message<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(message_id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let Some(message) = state.storage.find_message(&message_id).await? else {
        return Err(AppError::NotFound("Message not found".to_string()));
    };
    Ok(Json(message))
}

/// `PUT /messages/{message_id}`
///
/// Only the owning identity may edit; the comparison is an exact string
/// match against the stored `userId`.
pub async fn edit_message<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(message_id): Path<String>,
    Json(body): Json<EditMessageRequest>,
) -> Result<Json<Message>, AppError> {
    let Some(existing) = state.storage.find_message(&message_id).await? else {
        return Err(AppError::NotFound("Message not found".to_string()));
    };

    if body.user_id.as_deref() != Some(existing.user_id.as_str()) {
        return Err(AppError::Forbidden(
            "You can only edit your own messages".to_string(),
        ));
    }

    let Some(text) = body.message else {
        return Err(AppError::Validation("Message text is required".to_string()));
    };

    let updated = state
        .storage
        .update_message(
            &message_id,
            MessageEdit {
                message: text,
                last_edited_at: Utc::now(),
            },
        )
        .await?;

    Ok(Json(updated))
}

/// `DELETE /messages/{message_id}`
///
/// Same existence and ownership checks as edit; removal is permanent.
pub async fn delete_message<S: Storage + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(message_id): Path<String>,
    Json(body): Json<DeleteMessageRequest>,
) -> Result<Json<DeleteMessageResponse>, AppError> {
    let Some(existing) = state.storage.find_message(&message_id).await? else {
        return Err(AppError::NotFound("Message not found".to_string()));
    };

    if body.user_id.as_deref() != Some(existing.user_id.as_str()) {
        return Err(AppError::Forbidden(
            "You can only delete your own messages".to_string(),
        ));
    }

    if !state.storage.delete_message(&message_id).await? {
        return Err(AppError::NotFound("Message not found".to_string()));
    }

    Ok(Json(DeleteMessageResponse {
        success: true,
        message_id,
    }))
}
